use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};

use crate::model::item::ItemId;

pub type LogId = u64;

/// One consumption event. Logs are never edited once written.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Log {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<LogId>,
    /// May point at an item that has since been deleted.
    pub item_id: ItemId,
    /// Calendar day used for grouping, independent of the timestamp's clock time.
    pub date: NaiveDate,
    pub timestamp: DateTime<Utc>,
    pub quantity: f64,
    /// Frozen at write time from the item's rate.
    pub cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Log {
    /// Cycle window: stamped at or after `start`.
    pub fn is_since(&self, start: DateTime<Utc>) -> bool {
        self.timestamp >= start
    }

    pub fn is_on(&self, date: NaiveDate) -> bool {
        self.date == date
    }

    /// Inclusive on both ends; `None` leaves that side open.
    pub fn is_between(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
        start.map_or(true, |s| self.date >= s) && end.map_or(true, |e| self.date <= e)
    }
}

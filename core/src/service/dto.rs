use serde::{Serialize, Deserialize};
use chrono::{DateTime, NaiveDate, Utc};

use crate::model::item::{Item, ItemId};
use crate::model::log::{Log, LogId};
use crate::model::stats::{ItemStats, ItemSummary};
use crate::service::aggregate::UNKNOWN_ITEM;

/// A log joined with whatever is left of its item.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LogDto {
    pub id: Option<LogId>,
    pub item_id: ItemId,
    pub item_name: String,
    pub unit: Option<String>,
    pub date: NaiveDate,
    pub timestamp: DateTime<Utc>,
    pub quantity: f64,
    pub cost: f64,
    pub provider: Option<String>,
    pub note: Option<String>,
}

impl LogDto {
    pub fn from_entity(log: Log, item: Option<&Item>) -> Self {
        let (item_name, unit) = match item {
            Some(item) => (item.name.clone(), Some(item.unit.clone())),
            None => (UNKNOWN_ITEM.to_string(), None),
        };

        Self {
            id: log.id,
            item_id: log.item_id,
            item_name,
            unit,
            date: log.date,
            timestamp: log.timestamp,
            quantity: log.quantity,
            cost: log.cost,
            provider: log.provider,
            note: log.note,
        }
    }

    pub fn is_orphaned(&self) -> bool {
        self.unit.is_none()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DailyHistory {
    pub date: NaiveDate,
    pub day_of_week: String, // Mon, Tue...
    pub entries: Vec<LogDto>,
    pub total_cost: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DashboardRow {
    pub item: Item,
    /// Totals since the cycle started.
    pub stats: ItemStats,
    pub in_cart: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub cycle_start: DateTime<Utc>,
    pub rows: Vec<DashboardRow>,
    pub cycle_total: f64,
    pub cart_items: usize,
    pub cart_total: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Report {
    pub title: String,
    pub rows: Vec<ItemSummary>,
    pub total_cost: f64,
}

impl Report {
    /// Rows with anything logged in the window.
    pub fn active_rows(&self) -> impl Iterator<Item = &ItemSummary> {
        self.rows
            .iter()
            .filter(|r| r.stats.total_quantity != 0.0 || r.stats.total_cost != 0.0)
    }
}

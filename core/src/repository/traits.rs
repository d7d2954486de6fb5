use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};

use crate::model::item::{Item, ItemId};
use crate::model::log::{Log, LogId};

pub trait ItemRepository {
    /// Persists a new item and returns it with its assigned ID.
    fn create(&self, item: Item) -> Result<Item>;
    fn get(&self, id: ItemId) -> Result<Option<Item>>;
    fn list(&self) -> Result<Vec<Item>>;
    fn update(&self, item: &Item) -> Result<()>;
    fn delete(&self, id: ItemId) -> Result<()>;

    fn list_routine(&self) -> Result<Vec<Item>> {
        Ok(self.list()?.into_iter().filter(|i| i.is_routine).collect())
    }

    /// Case-insensitive exact match on the trimmed name. The first match wins.
    fn find_by_name(&self, name: &str) -> Result<Option<Item>> {
        let wanted = name.trim().to_lowercase();
        Ok(self
            .list()?
            .into_iter()
            .find(|i| i.name.trim().to_lowercase() == wanted))
    }
}

/// Logs are append-only: there is no update.
pub trait LogRepository {
    fn create(&self, log: Log) -> Result<Log>;
    fn get(&self, id: LogId) -> Result<Option<Log>>;
    /// All logs in insertion order.
    fn list(&self) -> Result<Vec<Log>>;
    fn delete(&self, id: LogId) -> Result<()>;

    /// Logs stamped at or after `start`.
    fn list_since(&self, start: DateTime<Utc>) -> Result<Vec<Log>> {
        Ok(self.list()?.into_iter().filter(|l| l.is_since(start)).collect())
    }

    fn list_on(&self, date: NaiveDate) -> Result<Vec<Log>> {
        Ok(self.list()?.into_iter().filter(|l| l.is_on(date)).collect())
    }

    /// Inclusive on both ends; `None` leaves that side open.
    fn list_between(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Vec<Log>> {
        Ok(self.list()?.into_iter().filter(|l| l.is_between(start, end)).collect())
    }

    fn list_for_item(&self, item_id: ItemId) -> Result<Vec<Log>> {
        Ok(self.list()?.into_iter().filter(|l| l.item_id == item_id).collect())
    }
}

/// Holds the start of the current billing cycle, apart from items and logs.
pub trait CycleStore {
    fn load(&self) -> Result<Option<DateTime<Utc>>>;
    fn save(&self, start: DateTime<Utc>) -> Result<()>;
}

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::resolve_data_dir;
use crate::error::LedgerError;
use crate::model::item::{Item, ItemId};
use crate::model::log::{Log, LogId};
use crate::repository::table::{JsonTable, Record};
use crate::repository::traits::{ItemRepository, LogRepository};

const ITEMS_FILE_NAME: &str = "items.json";
const LOGS_FILE_NAME: &str = "logs.json";

impl Record for Item {
    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }
}

impl Record for Log {
    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }
}

#[derive(Clone)]
pub struct FileItemRepository {
    table: JsonTable<Item>,
}

impl FileItemRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let dir = resolve_data_dir(base_dir)?;
        Self::open(&dir)
    }

    pub fn open(dir: &Path) -> Result<Self> {
        Ok(FileItemRepository {
            table: JsonTable::open(dir, ITEMS_FILE_NAME)?,
        })
    }
}

impl ItemRepository for FileItemRepository {
    fn create(&self, item: Item) -> Result<Item> {
        self.table.insert(item)
    }

    fn get(&self, id: ItemId) -> Result<Option<Item>> {
        self.table.find(id)
    }

    fn list(&self) -> Result<Vec<Item>> {
        self.table.all()
    }

    fn update(&self, item: &Item) -> Result<()> {
        if self.table.replace(item)? {
            Ok(())
        } else {
            Err(LedgerError::ItemNotFound(item.id.unwrap_or_default()).into())
        }
    }

    fn delete(&self, id: ItemId) -> Result<()> {
        if self.table.remove(id)? {
            Ok(())
        } else {
            Err(LedgerError::ItemNotFound(id).into())
        }
    }
}

#[derive(Clone)]
pub struct FileLogRepository {
    table: JsonTable<Log>,
}

impl FileLogRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let dir = resolve_data_dir(base_dir)?;
        Self::open(&dir)
    }

    pub fn open(dir: &Path) -> Result<Self> {
        Ok(FileLogRepository {
            table: JsonTable::open(dir, LOGS_FILE_NAME)?,
        })
    }
}

impl LogRepository for FileLogRepository {
    fn create(&self, log: Log) -> Result<Log> {
        self.table.insert(log)
    }

    fn get(&self, id: LogId) -> Result<Option<Log>> {
        self.table.find(id)
    }

    fn list(&self) -> Result<Vec<Log>> {
        self.table.all()
    }

    fn delete(&self, id: LogId) -> Result<()> {
        if self.table.remove(id)? {
            Ok(())
        } else {
            Err(LedgerError::LogNotFound(id).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use tempfile::tempdir;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn log(item_id: ItemId, date: &str, hour: u32) -> Log {
        let date = day(date);
        Log {
            id: None,
            item_id,
            date,
            timestamp: Utc.from_utc_datetime(&date.and_hms_opt(hour, 0, 0).unwrap()),
            quantity: 1.0,
            cost: 2.5,
            provider: None,
            note: None,
        }
    }

    #[test]
    fn test_item_crud() {
        let dir = tempdir().unwrap();
        let repo = FileItemRepository::open(dir.path()).unwrap();

        let milk = repo.create(Item::new("Milk".to_string(), "liter".to_string(), 2.5)).unwrap();
        let mut paper = Item::new("Paper".to_string(), "copy".to_string(), 5.0);
        paper.is_routine = false;
        let paper = repo.create(paper).unwrap();

        assert_eq!(milk.id, Some(1));
        assert_eq!(paper.id, Some(2));
        assert_eq!(repo.list().unwrap().len(), 2);
        assert_eq!(repo.list_routine().unwrap(), vec![milk.clone()]);

        let mut edited = milk.clone();
        edited.rate = 3.0;
        repo.update(&edited).unwrap();
        assert_eq!(repo.get(1).unwrap().unwrap().rate, 3.0);

        repo.delete(1).unwrap();
        assert!(repo.get(1).unwrap().is_none());
    }

    #[test]
    fn test_item_missing_errors() {
        let dir = tempdir().unwrap();
        let repo = FileItemRepository::open(dir.path()).unwrap();

        let err = repo.delete(42).unwrap_err();
        assert_eq!(err.downcast_ref::<LedgerError>(), Some(&LedgerError::ItemNotFound(42)));

        let mut ghost = Item::new("Ghost".to_string(), "pc".to_string(), 1.0);
        ghost.id = Some(7);
        assert!(repo.update(&ghost).is_err());
    }

    #[test]
    fn test_ids_are_not_reused() {
        let dir = tempdir().unwrap();
        let repo = FileLogRepository::open(dir.path()).unwrap();

        let first = repo.create(log(1, "2024-03-10", 8)).unwrap();
        repo.delete(first.id.unwrap()).unwrap();
        let second = repo.create(log(1, "2024-03-10", 9)).unwrap();

        assert_eq!(second.id, Some(2));
    }

    #[test]
    fn test_data_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let repo = FileLogRepository::open(dir.path()).unwrap();
            repo.create(log(1, "2024-03-10", 8)).unwrap();
        }
        let repo = FileLogRepository::open(dir.path()).unwrap();
        let logs = repo.list().unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].date, day("2024-03-10"));
    }

    #[test]
    fn test_log_queries() {
        let dir = tempdir().unwrap();
        let repo = FileLogRepository::open(dir.path()).unwrap();
        repo.create(log(1, "2024-01-31", 8)).unwrap();
        repo.create(log(2, "2024-02-01", 8)).unwrap();
        repo.create(log(1, "2024-02-15", 8)).unwrap();

        assert_eq!(repo.list_on(day("2024-02-01")).unwrap().len(), 1);
        assert_eq!(repo.list_for_item(1).unwrap().len(), 2);

        let january = repo
            .list_between(Some(day("2024-01-01")), Some(day("2024-01-31")))
            .unwrap();
        assert_eq!(january.len(), 1);
        assert_eq!(january[0].date, day("2024-01-31"));

        assert_eq!(repo.list_between(Some(day("2024-02-01")), None).unwrap().len(), 2);
        assert_eq!(repo.list_between(None, None).unwrap().len(), 3);

        let bound = Utc.from_utc_datetime(&day("2024-02-01").and_hms_opt(8, 0, 0).unwrap());
        assert_eq!(repo.list_since(bound).unwrap().len(), 2);
        assert_eq!(repo.list_since(bound + Duration::seconds(1)).unwrap().len(), 1);
    }

    #[test]
    fn test_corrupt_file_propagates_error() {
        let dir = tempdir().unwrap();
        let repo = FileLogRepository::open(dir.path()).unwrap();
        std::fs::write(dir.path().join(LOGS_FILE_NAME), "not json").unwrap();
        assert!(repo.list().is_err());
    }
}

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A row with an auto-assigned numeric ID.
pub trait Record: Serialize + DeserializeOwned + Clone {
    fn id(&self) -> Option<u64>;
    fn set_id(&mut self, id: u64);
}

#[derive(Serialize, Deserialize)]
struct TableFile<T> {
    next_id: u64,
    records: Vec<T>,
}

impl<T> Default for TableFile<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            records: Vec::new(),
        }
    }
}

/// One JSON file holding a collection plus its ID counter.
///
/// IDs only ever grow, so a deleted record's ID is never handed out again.
#[derive(Clone)]
pub struct JsonTable<T> {
    file_path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Record> JsonTable<T> {
    pub fn open(dir: &Path, file_name: &str) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(file_name);

        let table = Self {
            file_path: path,
            _marker: PhantomData,
        };
        if !table.file_path.exists() {
            table.write(&TableFile::default())?;
        }
        Ok(table)
    }

    fn read(&self) -> Result<TableFile<T>> {
        let file = File::open(&self.file_path)
            .with_context(|| format!("Failed to open {}", self.file_path.display()))?;
        let reader = BufReader::new(file);
        let table = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse {}", self.file_path.display()))?;
        Ok(table)
    }

    fn write(&self, table: &TableFile<T>) -> Result<()> {
        let file = File::create(&self.file_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, table)?;
        writer.flush()?;
        Ok(())
    }

    pub fn insert(&self, mut record: T) -> Result<T> {
        let mut table = self.read()?;
        let id = table.next_id;
        record.set_id(id);
        table.next_id += 1;
        table.records.push(record.clone());
        self.write(&table)?;
        debug!(id, file = %self.file_path.display(), "inserted record");
        Ok(record)
    }

    pub fn all(&self) -> Result<Vec<T>> {
        Ok(self.read()?.records)
    }

    pub fn find(&self, id: u64) -> Result<Option<T>> {
        Ok(self.read()?.records.into_iter().find(|r| r.id() == Some(id)))
    }

    /// Returns false when no record has the same ID.
    pub fn replace(&self, record: &T) -> Result<bool> {
        let mut table = self.read()?;
        match table.records.iter().position(|r| r.id().is_some() && r.id() == record.id()) {
            Some(pos) => {
                table.records[pos] = record.clone();
                self.write(&table)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Returns false when nothing was removed.
    pub fn remove(&self, id: u64) -> Result<bool> {
        let mut table = self.read()?;
        let initial_len = table.records.len();
        table.records.retain(|r| r.id() != Some(id));

        if table.records.len() == initial_len {
            return Ok(false);
        }

        self.write(&table)?;
        Ok(true)
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::resolve_data_dir;
use crate::repository::traits::CycleStore;

const CYCLE_FILE_NAME: &str = "cycle.json";

#[derive(Serialize, Deserialize)]
struct CycleFile {
    cycle_start: DateTime<Utc>,
}

#[derive(Clone)]
pub struct FileCycleStore {
    file_path: PathBuf,
}

impl FileCycleStore {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let dir = resolve_data_dir(base_dir)?;
        Self::open(&dir)
    }

    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            file_path: dir.join(CYCLE_FILE_NAME),
        })
    }
}

impl CycleStore for FileCycleStore {
    fn load(&self) -> Result<Option<DateTime<Utc>>> {
        if !self.file_path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.file_path)?;
        let file: CycleFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.file_path.display()))?;
        Ok(Some(file.cycle_start))
    }

    fn save(&self, start: DateTime<Utc>) -> Result<()> {
        let content = serde_json::to_string_pretty(&CycleFile { cycle_start: start })?;
        fs::write(&self.file_path, content)?;
        Ok(())
    }
}

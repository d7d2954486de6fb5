use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use dailyusage_core::{
    resolve_data_dir, CycleService, FileCycleStore, FileItemRepository, FileLogRepository,
    ItemService, LogService, Settings,
};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "DAILYUSAGE_LOG";
const LOG_FILE_NAME: &str = "dailyusage.log";

/// Everything a command needs, wired to the file store in one data directory.
pub struct AppContext {
    pub data_dir: PathBuf,
    pub settings: Settings,
    pub items: ItemService<FileItemRepository>,
    pub logs: LogService<FileLogRepository>,
    pub cycle: CycleService<FileCycleStore>,
}

impl AppContext {
    pub fn open(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = resolve_data_dir(data_dir)?;
        let settings = Settings::load(&data_dir)?;

        Ok(Self {
            items: ItemService::new(FileItemRepository::open(&data_dir)?),
            logs: LogService::new(FileLogRepository::open(&data_dir)?),
            cycle: CycleService::new(FileCycleStore::open(&data_dir)?),
            settings,
            data_dir,
        })
    }

    pub fn save_settings(&self) -> Result<()> {
        self.settings.save(&self.data_dir)
    }
}

/// Installs the global subscriber. The TUI owns the terminal, so it logs to a file.
pub fn init_logging(data_dir: &Path, to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    if to_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(data_dir.join(LOG_FILE_NAME))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

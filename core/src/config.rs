use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::settings::Theme;

pub const DATA_DIR_ENV: &str = "DAILYUSAGE_DIR";
const SETTINGS_FILE_NAME: &str = "settings.json";

/// User preferences. Every field has a default so older files keep loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub theme: Theme,
    /// chrono format string for history day headings.
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            theme: Theme::default(),
            date_format: default_date_format(),
        }
    }
}

fn default_currency() -> String {
    "₹".to_string()
}

fn default_date_format() -> String {
    "%A, %B %-d, %Y".to_string()
}

impl Settings {
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(SETTINGS_FILE_NAME);
        if !path.exists() {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let settings = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(settings)
    }

    pub fn save(&self, data_dir: &Path) -> Result<()> {
        fs::create_dir_all(data_dir)?;
        let path = data_dir.join(SETTINGS_FILE_NAME);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn format_money(&self, amount: f64) -> String {
        format!("{}{:.2}", self.currency, amount)
    }

    /// Formats a history heading, falling back to the default on a bad format string.
    pub fn date_heading(&self, date: NaiveDate) -> String {
        let valid = !StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error));
        if valid {
            date.format(&self.date_format).to_string()
        } else {
            date.format(&default_date_format()).to_string()
        }
    }
}

/// Picks the data directory: explicit path, then `DAILYUSAGE_DIR`, then `~/.dailyusage`.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    let path = match explicit {
        Some(dir) => dir,
        None => match std::env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => {
                let home_dir = dirs::home_dir()
                    .ok_or_else(|| anyhow!("Could not determine home directory"))?;
                home_dir.join(".dailyusage")
            }
        },
    };
    fs::create_dir_all(&path)?;
    Ok(path)
}

//! Persisted application settings.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

const CONFIG_FILE: &str = "config.json";

fn default_interval() -> u64 {
    1
}

/// User-adjustable settings, stored as `config.json` in the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Minutes between periodic pending-task reminders.
    #[serde(default = "default_interval")]
    pub reminder_interval_minutes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reminder_interval_minutes: default_interval(),
        }
    }
}

impl Config {
    /// Loads settings from `dir`. Missing or corrupt files fall back to
    /// defaults, never an error.
    pub fn load(dir: &Path) -> Self {
        let path = dir.join(CONFIG_FILE);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                warn!("cannot read config: {e}");
                return Self::default();
            }
        };
        serde_json::from_str(&contents).unwrap_or_else(|e| {
            warn!("corrupt config, using defaults: {e}");
            Self::default()
        })
    }

    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(dir.join(CONFIG_FILE), json)?;
        Ok(())
    }
}

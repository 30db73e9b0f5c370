use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

const APP_DIR: &str = "escalero";
const SETTINGS_FILE: &str = "settings.json";
pub const DATA_DIR_ENV: &str = "ESCALERO_DATA_DIR";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_version")]
    version: u32,

    /// Keep the game history on disk between sessions.
    #[serde(default)]
    pub persist_history: bool,

    /// How many games the history summary shows.
    #[serde(default = "default_recent_history_limit")]
    pub recent_history_limit: usize,

    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

// Helper functions for default values
fn default_version() -> u32 {
    2
}
fn default_recent_history_limit() -> usize {
    8
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: default_version(),
            persist_history: false,
            recent_history_limit: default_recent_history_limit(),
            data_dir: None,
        }
    }
}

impl Settings {
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Reads the settings file in the default data directory.
    pub fn load() -> Self {
        Self::load_from(&Self::default_data_dir().join(SETTINGS_FILE))
    }

    /// Missing or unreadable files yield the defaults.
    pub fn load_from(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(_) => return Settings::default(),
        };
        match serde_json::from_str::<Settings>(&contents) {
            Ok(mut settings) => {
                settings.migrate();
                settings
            }
            Err(err) => {
                warn!(target: "settings", "Ignoring malformed {}: {}", path.display(), err);
                Settings::default()
            }
        }
    }

    /// Writes to the file `load` reads. `data_dir` only moves the history.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_data_dir().join(SETTINGS_FILE))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure the directory exists
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Explicit `data_dir` first, then `$ESCALERO_DATA_DIR`, then the
    /// platform data directory.
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    fn default_data_dir() -> PathBuf {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.is_empty() {
                return PathBuf::from(dir);
            }
        }
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    fn migrate(&mut self) {
        match self.version {
            0 | 1 => {
                // version 1 had no summary limit and kept the whole list
                self.recent_history_limit = default_recent_history_limit();
                self.version = 2;
            }
            _ => (),
        }
    }
}

//! Settings configuration types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::Config;

/// General settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// User id used when `--user` is not given
    #[serde(default = "default_user")]
    pub default_user: String,

    /// Progression storage
    #[serde(default)]
    pub store: StoreSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_user: default_user(),
            store: StoreSettings::default(),
        }
    }
}

fn default_user() -> String {
    "guest".to_string()
}

/// Storage backend for user progressions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// SQLite database (default)
    #[default]
    Sqlite,
    /// One JSON file per user
    Json,
    /// Nothing survives the process
    Memory,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Directory for store files (defaults to ~/.ecycle)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl StoreSettings {
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(Config::global_config_dir)
    }
}

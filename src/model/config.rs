use serde::{Deserialize, Serialize};

use crate::util::date::{DEFAULT_UTC_OFFSET_HOURS, RefZone};

/// Configuration from config.toml. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub time: TimeConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Blob key the task collection is stored under
    #[serde(default = "default_storage_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            key: default_storage_key(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeConfig {
    /// Hours east of UTC for the reference zone
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        TimeConfig {
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

impl TimeConfig {
    pub fn zone(&self) -> Option<RefZone> {
        RefZone::from_hours(self.utc_offset_hours)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Width of one calendar column in terminal cells
    #[serde(default = "default_cell_width")]
    pub cell_width: usize,
    /// Task lines shown per calendar cell before "+N more"
    #[serde(default = "default_max_tasks_per_cell")]
    pub max_tasks_per_cell: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            cell_width: default_cell_width(),
            max_tasks_per_cell: default_max_tasks_per_cell(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
        }
    }
}

fn default_storage_key() -> String {
    "todos".to_string()
}

fn default_utc_offset_hours() -> i32 {
    DEFAULT_UTC_OFFSET_HOURS
}

fn default_cell_width() -> usize {
    12
}

fn default_max_tasks_per_cell() -> usize {
    3
}

fn default_log_level() -> String {
    "warn".to_string()
}

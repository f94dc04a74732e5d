use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::io::blob_store::is_valid_key;
use crate::model::config::Config;
use crate::util::date::RefZone;

/// Error type for config loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("utc_offset_hours must be between -23 and 23, got {0}")]
    InvalidOffset(i32),
    #[error("storage key '{0}' may only contain letters, digits, '-' and '_'")]
    InvalidStorageKey(String),
}

pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

/// Read `config.toml` from the data directory. A missing file yields the
/// default config.
pub fn read_config(data_dir: &Path) -> Result<Config, ConfigError> {
    let path = config_path(data_dir);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(source) => return Err(ConfigError::ReadError { path, source }),
    };
    let config: Config = toml::from_str(&text)?;
    // Reject a bad offset here so later code can rely on a valid zone
    reference_zone(&config)?;
    if !is_valid_key(&config.storage.key) {
        return Err(ConfigError::InvalidStorageKey(config.storage.key));
    }
    Ok(config)
}

/// The reference zone a config selects.
pub fn reference_zone(config: &Config) -> Result<RefZone, ConfigError> {
    config
        .time
        .zone()
        .ok_or(ConfigError::InvalidOffset(config.time.utc_offset_hours))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_default() {
        let tmp = TempDir::new().unwrap();
        let config = read_config(tmp.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.storage.key, "todos");
        assert_eq!(config.time.utc_offset_hours, 9);
        assert_eq!(config.display.cell_width, 12);
        assert_eq!(config.log.level, "warn");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            config_path(tmp.path()),
            "[time]\nutc_offset_hours = -5\n\n[display]\nmax_tasks_per_cell = 1\n",
        )
        .unwrap();
        let config = read_config(tmp.path()).unwrap();
        assert_eq!(config.time.utc_offset_hours, -5);
        assert_eq!(config.display.max_tasks_per_cell, 1);
        assert_eq!(config.display.cell_width, 12);
        assert_eq!(config.storage.key, "todos");
        assert_eq!(
            reference_zone(&config).unwrap().offset().local_minus_utc(),
            -5 * 3600
        );
    }

    #[test]
    fn out_of_range_offset_is_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(config_path(tmp.path()), "[time]\nutc_offset_hours = 30\n").unwrap();
        assert!(matches!(
            read_config(tmp.path()),
            Err(ConfigError::InvalidOffset(30))
        ));
    }

    #[test]
    fn storage_key_with_unsafe_characters_is_rejected() {
        let tmp = TempDir::new().unwrap();
        for key in ["my todos", "../todos", ""] {
            fs::write(
                config_path(tmp.path()),
                format!("[storage]\nkey = \"{}\"\n", key),
            )
            .unwrap();
            match read_config(tmp.path()) {
                Err(ConfigError::InvalidStorageKey(k)) => assert_eq!(k, key),
                other => panic!("expected InvalidStorageKey for {:?}, got {:?}", key, other),
            }
        }
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(config_path(tmp.path()), "[time\n").unwrap();
        assert!(matches!(
            read_config(tmp.path()),
            Err(ConfigError::ParseError(_))
        ));
    }
}

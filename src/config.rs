//! Configuration loading
//!
//! Reads an optional `config.toml` and applies environment overrides:
//! - `TASKPAD_CONFIG`: path of the configuration file
//! - `TASKPAD_DATA_DIR`: directory holding `tasks.json` and `profile.json`
//! - `TASKPAD_LOG`: tracing filter (e.g. `debug`, `taskpad=trace`)

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;

pub const CONFIG_ENV: &str = "TASKPAD_CONFIG";
pub const DATA_DIR_ENV: &str = "TASKPAD_DATA_DIR";
pub const LOG_ENV: &str = "TASKPAD_LOG";

const APP_DIR: &str = "taskpad";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Where the task collection and profile live
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// How long a mutation waits for the storage lock
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,

    /// Tracing filter directive
    #[serde(default = "default_log")]
    pub log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            lock_timeout_ms: default_lock_timeout_ms(),
            log: default_log(),
        }
    }
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

fn default_log() -> String {
    "warn".to_string()
}

impl Config {
    /// Loads the configuration file (if any) and applies environment overrides.
    pub fn load() -> Result<Self> {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let path = explicit.clone().or_else(|| {
            dirs::config_dir().map(|mut p| {
                p.push(APP_DIR);
                p.push("config.toml");
                p
            })
        });

        let mut config = match path {
            Some(p) if p.exists() => {
                let raw = fs::read_to_string(&p)
                    .map_err(|e| Error::InvalidConfig(format!("{}: {}", p.display(), e)))?;
                Self::from_toml_str(&raw)?
            }
            Some(p) if explicit.is_some() => {
                return Err(Error::InvalidConfig(format!("{} does not exist", p.display())));
            }
            _ => Self::default(),
        };

        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            config.data_dir = Some(PathBuf::from(dir));
        }
        if let Ok(filter) = std::env::var(LOG_ENV) {
            if !filter.trim().is_empty() {
                config.log = filter.trim().to_string();
            }
        }
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Config = toml::from_str(raw).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        if config.lock_timeout_ms == 0 {
            return Err(Error::InvalidConfig("lock_timeout_ms must be greater than zero".into()));
        }
        Ok(config)
    }

    /// Directory holding the persisted keys.
    ///
    /// Falls back to the platform data directory, then to the working directory.
    pub fn resolve_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
            p.push(APP_DIR);
            p
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.lock_timeout_ms, DEFAULT_LOCK_TIMEOUT_MS);
        assert_eq!(config.log, "warn");
    }

    #[test]
    fn reads_all_fields() {
        let config = Config::from_toml_str(
            r#"
            data_dir = "/tmp/taskpad"
            lock_timeout_ms = 250
            log = "taskpad=debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/taskpad")));
        assert_eq!(config.resolve_data_dir(), PathBuf::from("/tmp/taskpad"));
        assert_eq!(config.lock_timeout_ms, 250);
        assert_eq!(config.log, "taskpad=debug");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = Config::from_toml_str("lock_timeout_ms = 0").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn malformed_toml_is_invalid_config() {
        let err = Config::from_toml_str("lock_timeout_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn default_data_dir_ends_with_app_dir() {
        let dir = Config::default().resolve_data_dir();
        assert!(dir.ends_with(APP_DIR));
    }
}

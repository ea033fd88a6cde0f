//! Host settings
//!
//! Settings come from an optional JSON file named by `TEMPCLOCK_CONFIG`
//! (a `.env` file in the working directory is honoured). Missing fields and a
//! missing variable both fall back to the reference defaults.

use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

use tempclock_core::MonitorConfig;
use tempclock_core::bus::SessionPolicy;
use tempclock_core::sink::LOG_FILE_NAME;

use crate::rppal_bus::DEFAULT_I2C_BUS;

/// Environment variable holding the settings file path.
pub const CONFIG_ENV: &str = "TEMPCLOCK_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub monitor: MonitorConfig,
    pub i2c_bus: u8,
    pub session: SessionPolicy,
    pub log_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            monitor: MonitorConfig::default(),
            i2c_bus: DEFAULT_I2C_BUS,
            session: SessionPolicy::default(),
            log_path: PathBuf::from(LOG_FILE_NAME),
        }
    }
}

impl Settings {
    pub fn from_json(text: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text, path)
    }

    /// Load from the file named by [`CONFIG_ENV`], or use defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                let path = PathBuf::from(path);
                info!("Loading settings from {}", path.display());
                Self::from_file(&path)
            }
            None => {
                info!("{} not set, using default settings", CONFIG_ENV);
                Ok(Self::default())
            }
        }
    }
}

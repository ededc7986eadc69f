//! `income.toml` configuration.
//!
//! ```toml
//! [database]
//! backend = "sqlite"
//! connection_string = "income.db"
//!
//! [logging]
//! level = "info"
//! file = "income.log"
//!
//! [display]
//! period = "month"
//! ```
//!
//! Every section and key is optional. Command-line flags override the file.

use std::path::{Path, PathBuf};

use income_core::db::DbConfig;
use income_core::{DisplayPeriod, ParseDisplayPeriodError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "income.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("failed to write config file: {path}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Period(#[from] ParseDisplayPeriodError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub backend: String,
    pub connection_string: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        let db = DbConfig::default();
        Self {
            backend: db.backend,
            connection_string: db.connection_string,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Bare level or any `EnvFilter` directive. `RUST_LOG` wins when set.
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    pub period: String,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            period: "month".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseSection,
    pub logging: LoggingSection,
    pub display: DisplaySection,
}

impl Config {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.display_period()?;
        Ok(config)
    }

    /// An explicit path must exist. Without one, `income.toml` in the
    /// working directory is used if present, defaults otherwise.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Save to a TOML file.
    pub fn save(
        &self,
        path: &Path,
    ) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }

    pub fn display_period(&self) -> Result<DisplayPeriod, ConfigError> {
        Ok(self.display.period.parse()?)
    }

    /// Database settings with command-line overrides applied.
    pub fn db_config(
        &self,
        backend: Option<&str>,
        connection_string: Option<&str>,
    ) -> DbConfig {
        DbConfig::new(
            backend.unwrap_or(&self.database.backend),
            connection_string.unwrap_or(&self.database.connection_string),
        )
    }
}

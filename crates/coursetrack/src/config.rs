//! Configuration management for coursetrack.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "coursetrack";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "sections.db";

/// Suffix appended to the sanitized page title when exporting.
pub const DEFAULT_BACKUP_SUFFIX: &str = "_backup.json";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `COURSETRACK_`)
/// 2. TOML config file at `~/.config/coursetrack/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Backup export configuration.
    pub export: ExportConfig,
    /// Navigation configuration.
    pub navigation: NavigationConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/coursetrack/sections.db`
    pub database_path: Option<PathBuf>,
}

/// Export-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory backups are written to. Defaults to the working directory.
    pub directory: Option<PathBuf>,
    /// Suffix appended to the sanitized page title.
    pub file_suffix: String,
}

/// Navigation-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Pixels the carousel moves per scroll button click.
    pub scroll_step_px: u32,
    /// Delay before page navigation, leaving time for the loading overlay.
    pub navigate_delay_ms: u64,
    /// Extra gap kept above an anchor target when scrolling to it.
    pub anchor_offset_px: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            scroll_step_px: 200,
            navigate_delay_ms: 300,
            anchor_offset_px: 20,
        }
    }
}

impl Config {
    /// Load configuration, reading `config_path` or the default file.
    ///
    /// A missing file is not an error; its layer is simply empty.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("COURSETRACK_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.export.file_suffix.is_empty() {
            return Err(Error::ConfigValidation {
                message: "export.file_suffix must not be empty".to_string(),
            });
        }

        if self.navigation.scroll_step_px == 0 {
            return Err(Error::ConfigValidation {
                message: "navigation.scroll_step_px must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the export directory, falling back to the working directory.
    #[must_use]
    pub fn export_dir(&self) -> PathBuf {
        self.export
            .directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Get the navigation delay as a Duration.
    #[must_use]
    pub fn navigate_delay(&self) -> Duration {
        Duration::from_millis(self.navigation.navigate_delay_ms)
    }
}

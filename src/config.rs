//! Configuration management for Typemetry
//!
//! Provides persistent configuration that is automatically saved to and loaded
//! from a platform-specific config file.
//!
//! ## Config File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/typemetry/config.toml` |
//! | macOS | `~/Library/Application Support/typemetry/config.toml` |
//! | Windows | `%APPDATA%\typemetry\config.toml` |
//!
//! ## Example
//!
//! ```no_run
//! use typemetry::Config;
//!
//! // Load existing config or use defaults
//! let mut config = Config::load().unwrap_or_default();
//!
//! // Modify settings
//! config.analysis.time_limit_secs = 2.0;
//!
//! // Save to disk
//! config.save().expect("Failed to save config");
//! ```

use crate::layout::LayoutOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to determine the config directory
    #[error("could not determine config directory")]
    NoConfigDir,
    /// IO error reading or writing the config file
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    /// Failed to parse the config file
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize the config
    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Returns the path to the config file.
///
/// Creates the config directory if it doesn't exist.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    let app_dir = config_dir.join("typemetry");

    if !app_dir.exists() {
        fs::create_dir_all(&app_dir)?;
    }

    Ok(app_dir.join("config.toml"))
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Keystroke log settings
    #[serde(default)]
    pub log: LogConfig,
    /// Analysis settings
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Keyboard layout options
    #[serde(default)]
    pub layout: LayoutOptions,
}

/// Keystroke log settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Path to the keystroke log file
    pub path: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("loggedData.txt"),
        }
    }
}

/// Analysis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Transitions slower than this many seconds count as thinking
    /// pauses and are excluded from the transition statistics
    pub time_limit_secs: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: 1.5,
        }
    }
}

impl Config {
    /// Load configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// Useful for testing or using custom config locations.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default config file.
    ///
    /// Creates the config directory and file if they don't exist.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

//! Configuration management for appliance-aid.
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
const DATA_DIR_NAME: &str = "appliance-aid";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "history.db";

/// Default Gemini model used for diagnosis and technician search.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default Gemini API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Environment variable consulted when no API key is configured.
pub const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";

/// A latitude/longitude pair used to ground the technician search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Coordinates {
    /// Create a new coordinate pair.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `APPLIANCE_AID_`)
/// 2. TOML config file at `~/.config/appliance-aid/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gemini API configuration.
    pub api: ApiConfig,
    /// Home location used for the technician search.
    pub location: LocationConfig,
    /// Diagnosis history configuration.
    pub history: HistoryConfig,
}

/// Gemini API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API key. When unset, the `GEMINI_API_KEY` environment variable is
    /// consulted instead.
    pub key: Option<String>,
    /// Model name to query.
    pub model: String,
    /// Base URL of the Gemini API.
    pub endpoint: String,
    /// Request timeout in seconds.
    pub timeout: u64,
}

/// Home location configuration.
///
/// A CLI has no geolocation service to ask, so the coordinates used for the
/// technician search come from here (or from `--lat`/`--lng` flags).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// Latitude in decimal degrees.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees.
    pub longitude: Option<f64>,
}

/// Diagnosis history configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Path to the history database file.
    /// Defaults to `~/.local/share/appliance-aid/history.db`
    pub path: Option<PathBuf>,
    /// Whether completed diagnoses are saved at all.
    pub enabled: bool,
    /// Number of history entries to retain.
    /// Set to 0 for unlimited.
    pub keep: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key: None, // Resolved from the environment at runtime
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: 60,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: None, // Will be resolved to default at runtime
            enabled: true,
            keep: 200,
        }
    }
}

impl ApiConfig {
    /// Resolve the API key from config or the environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ApiKeyMissing`] when neither the config file nor the
    /// `GEMINI_API_KEY` environment variable provides a non-empty key.
    pub fn resolved_key(&self) -> Result<String> {
        self.key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV_VAR).ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or(Error::ApiKeyMissing)
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl LocationConfig {
    /// Get the configured coordinates, if both halves are present.
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
            _ => None,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `APPLIANCE_AID_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("APPLIANCE_AID_").split("_"));

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
        if self.api.model.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "api.model must not be empty".to_string(),
            });
        }

        if !self.api.endpoint.starts_with("http://") && !self.api.endpoint.starts_with("https://")
        {
            return Err(Error::ConfigValidation {
                message: format!("api.endpoint must be an http(s) URL: {}", self.api.endpoint),
            });
        }

        if self.api.timeout == 0 {
            return Err(Error::ConfigValidation {
                message: "api.timeout must be greater than 0".to_string(),
            });
        }

        // Coordinates only make sense as a pair
        if self.location.latitude.is_some() != self.location.longitude.is_some() {
            return Err(Error::ConfigValidation {
                message: "location.latitude and location.longitude must be set together"
                    .to_string(),
            });
        }

        if let Some(latitude) = self.location.latitude {
            if !(-90.0..=90.0).contains(&latitude) {
                return Err(Error::ConfigValidation {
                    message: format!("location.latitude must be between -90 and 90 (got {latitude})"),
                });
            }
        }

        if let Some(longitude) = self.location.longitude {
            if !(-180.0..=180.0).contains(&longitude) {
                return Err(Error::ConfigValidation {
                    message: format!(
                        "location.longitude must be between -180 and 180 (got {longitude})"
                    ),
                });
            }
        }

        Ok(())
    }

    /// Get the history database path, resolving defaults if not set.
    #[must_use]
    pub fn history_path(&self) -> PathBuf {
        self.history
            .path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }
}

//! Configuration management for littlelemon.
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
const DATA_DIR_NAME: &str = "littlelemon";

/// Default menu database file name.
const MENU_DATABASE_FILE_NAME: &str = "little_lemon.db";

/// Default session database file name.
const SESSION_DATABASE_FILE_NAME: &str = "session.db";

/// Longest accepted search quiet period, in milliseconds.
pub const MAX_DEBOUNCE_MS: u64 = 60_000;

/// Catalog published for the Little Lemon capstone.
pub const DEFAULT_FEED_URL: &str =
    "https://raw.githubusercontent.com/Meta-Mobile-Developer-PC/Working-With-Data-API/main/capstone.json";

/// Where menu images referenced by the catalog live.
pub const DEFAULT_IMAGE_BASE_URL: &str =
    "https://github.com/Meta-Mobile-Developer-PC/Working-With-Data-API/blob/main/images";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `LITTLELEMON_`)
/// 2. TOML config file at `~/.config/littlelemon/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Remote feed configuration.
    pub feed: FeedConfig,
    /// Search configuration.
    pub search: SearchConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the menu database.
    /// Defaults to `~/.local/share/littlelemon/little_lemon.db`
    pub database_path: Option<PathBuf>,
    /// Path to the session database.
    /// Defaults to `~/.local/share/littlelemon/session.db`
    pub session_path: Option<PathBuf>,
}

/// Remote feed configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// URL of the menu catalog document.
    pub url: String,
    /// Base URL menu image names are resolved against.
    pub image_base_url: String,
    /// Request timeout in seconds. Set to 0 for none.
    pub timeout_secs: u64,
}

/// Search-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before searching, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            timeout_secs: 0,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { debounce_ms: 500 }
    }
}

impl Config {
    /// Load configuration from all sources.
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
            .merge(Env::prefixed("LITTLELEMON_").split("__"));

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
        for (name, url) in [
            ("feed.url", &self.feed.url),
            ("feed.image_base_url", &self.feed.image_base_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::ConfigValidation {
                    message: format!("{name} must be an http(s) URL, got {url:?}"),
                });
            }
        }

        if self.search.debounce_ms == 0 || self.search.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(Error::ConfigValidation {
                message: format!(
                    "search.debounce_ms must be between 1 and {MAX_DEBOUNCE_MS}, got {}",
                    self.search.debounce_ms
                ),
            });
        }

        Ok(())
    }

    /// Get the menu database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(MENU_DATABASE_FILE_NAME))
    }

    /// Get the session database path, resolving defaults if not set.
    #[must_use]
    pub fn session_path(&self) -> PathBuf {
        self.storage
            .session_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(SESSION_DATABASE_FILE_NAME))
    }

    /// Get the feed request timeout, if any.
    #[must_use]
    pub fn feed_timeout(&self) -> Option<Duration> {
        (self.feed.timeout_secs > 0).then(|| Duration::from_secs(self.feed.timeout_secs))
    }

    /// Get the search debounce period as a Duration.
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }
}

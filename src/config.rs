//! Application configuration loading and validation.
//!
//! Settings come from a TOML file; the bot credential is deliberately kept
//! out of it and read from the `TELEGRAM_BOT_TOKEN` environment variable
//! (`.env` files are honored via dotenvy). A missing config file falls back
//! to defaults; a malformed one is a fatal startup error.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{ConfigError, Error, Result};

/// Environment variable holding the Telegram bot token.
pub const BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

/// Main application configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub watcher: WatcherConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Persistence settings.
#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    /// Path of the tracking data file.
    #[serde(default = "default_storage_path")]
    pub path: String,
}

fn default_storage_path() -> String {
    "tracking.json".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

/// Catalog API settings.
#[derive(Debug, Deserialize)]
pub struct CatalogConfig {
    /// Card detail endpoint; the article is passed as the `nm` query param.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "https://card.wb.ru/cards/v4/detail".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

impl CatalogConfig {
    /// Request timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Reconciliation loop settings.
#[derive(Debug, Deserialize)]
pub struct WatcherConfig {
    /// Seconds between reconciliation ticks.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Seconds to wait between catalog requests within a tick. This is the
    /// only upstream rate limiting performed.
    #[serde(default = "default_request_delay_secs")]
    pub request_delay_secs: u64,
}

const fn default_interval_secs() -> u64 {
    600
}

const fn default_request_delay_secs() -> u64 {
    2
}

impl WatcherConfig {
    /// Tick interval as a [`Duration`].
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Inter-request delay as a [`Duration`].
    #[must_use]
    pub const fn request_delay(&self) -> Duration {
        Duration::from_secs(self.request_delay_secs)
    }
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            request_delay_secs: default_request_delay_secs(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `pretty` or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl LoggingConfig {
    /// Initialize the tracing subscriber with this logging configuration.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ReadFile`], [`ConfigError::Parse`], or a validation
    /// failure.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load configuration, falling back to defaults when the file is absent.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`], except a missing file is not an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse_toml(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(Error::Config(ConfigError::ReadFile(e))),
        }
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] or a validation failure.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.storage.path.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "storage.path",
                reason: "cannot be empty".into(),
            }
            .into());
        }
        if self.catalog.api_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "catalog.api_url",
                reason: "cannot be empty".into(),
            }
            .into());
        }
        if self.catalog.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "catalog.timeout_secs",
                reason: "must be positive".into(),
            }
            .into());
        }
        if self.watcher.interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "watcher.interval_secs",
                reason: "must be positive".into(),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize logging from the `[logging]` section.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

/// Read the bot token from the environment.
///
/// # Errors
///
/// [`ConfigError::MissingEnv`] when the variable is unset or empty; the
/// process must not start without a credential.
pub fn bot_token_from_env() -> Result<String> {
    match std::env::var(BOT_TOKEN_ENV) {
        Ok(token) if !token.trim().is_empty() => Ok(token),
        _ => Err(ConfigError::MissingEnv {
            name: BOT_TOKEN_ENV,
        }
        .into()),
    }
}

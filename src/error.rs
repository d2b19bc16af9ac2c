use thiserror::Error;

use crate::domain::error::DomainError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Catalog adapter errors.
///
/// The adapter performs no retries; callers decide how to react. A direct
/// command reports these to the subscriber, the watcher logs them and skips
/// the product until the next tick.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("no product found for article {article}")]
    NotFound { article: String },

    #[error("catalog request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("catalog returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("failed to decode catalog response: {reason}")]
    Decode { reason: String },
}

/// Tracking store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The persisted registry could not be read at startup. Fatal.
    #[error("failed to read tracking data file: {0}")]
    ReadFile(#[source] std::io::Error),

    /// The persisted registry exists but does not parse. Fatal at startup.
    #[error("tracking data file is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),

    /// A durable snapshot write failed. The in-memory mutation is kept;
    /// durability is best-effort, not transactional.
    #[error("failed to persist tracking data: {0}")]
    Persist(#[source] std::io::Error),

    #[error("failed to serialize tracking data: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, Error>;

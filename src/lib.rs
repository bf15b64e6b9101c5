//! Cuvée: an incremental wine-catalog harvester
//!
//! This crate harvests product listings from a paginated catalog, extracts a
//! fixed attribute set per item with a tiered fallback strategy, caches one
//! image per item, and merges the results into a persisted CSV dataset
//! without duplicating previously seen titles.

pub mod assets;
pub mod config;
pub mod dataset;
pub mod extract;
pub mod harvest;

use thiserror::Error;

/// Main error type for harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch failed for {url} after {attempts} attempts: {reason}")]
    FetchExhausted {
        url: String,
        attempts: u32,
        reason: String,
    },

    #[error("Missing title on detail page {url}")]
    MissingTitle { url: String },

    #[error("No price token on detail page {url}")]
    MissingPrice { url: String },

    #[error("Unparseable price {value:?} on detail page {url}")]
    BadPrice { url: String, value: String },

    #[error("Dataset file error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed dataset row {row}: {message}")]
    DatasetRow { row: usize, message: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use dataset::DatasetStore;
pub use extract::{ExtractedItem, Field, FieldValues, ItemRecord};
pub use harvest::Controller;

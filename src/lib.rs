//! etcsl-harvest: a corpus ingestion pipeline for linked HTML reference works
//!
//! This crate crawls a catalog of section pages, discovers entry pages,
//! extracts a normalized record from each one, and appends the records as a
//! line-delimited JSON corpus for downstream training tooling.

pub mod config;
pub mod output;
pub mod pipeline;
pub mod url;
pub mod vocab;

use thiserror::Error;

/// Main error type for harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("No entry links discovered across {seed_count} seed page(s)")]
    NoEntriesFound { seed_count: usize },

    #[error("No title element in {url}")]
    MissingTitle { url: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Record serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Corpus writer terminated unexpectedly")]
    WriterClosed,

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

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Tag '{0}' is not in the controlled vocabulary")]
    UnknownTag(String),
}

/// Result type alias for harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use pipeline::{Harvester, HarvestReport};
pub use url::{resolve_href, LinkPredicate};
pub use vocab::ControlledVocabulary;

//! GastroMiner: a concurrent nutritional-data extractor
//!
//! This crate pulls food composition records from an XML-over-HTTP query
//! service (BEDCA by default), one record per food identifier, and writes
//! them as rows of a CSV file. It checks robots.txt before touching the
//! service, throttles every request, and keeps going when a single item fails.

pub mod config;
pub mod miner;
pub mod output;
pub mod protocol;
pub mod record;
pub mod robots;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Fatal, run-aborting errors
///
/// Per-item problems never show up here; they are reported as
/// [`miner::Failure`] values and counted in the run summary.
#[derive(Debug, Error)]
pub enum GastroError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Access denied by robots.txt at {policy_url} for {target_url}")]
    AccessDenied {
        policy_url: String,
        target_url: String,
    },

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid run phase transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::RunPhase,
        to: state::RunPhase,
    },
}

impl GastroError {
    /// Name of the phase that failed, used in the fatal diagnostic
    pub fn phase(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::AccessDenied { .. } => "policy",
            Self::Catalog(_) => "catalog",
            Self::Storage(_) => "storage",
            Self::Http(_) => "http",
            Self::InvalidTransition { .. } => "engine",
        }
    }
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
}

/// Errors raised while resolving the identifier catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog request failed: {0}")]
    Request(String),

    #[error("Catalog request returned HTTP {0}")]
    Status(u16),

    #[error("Catalog response is malformed: {0}")]
    Malformed(#[from] ParseError),

    #[error("Catalog response contains no identifiers")]
    Empty,
}

/// Errors raised while decoding a response document
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Empty response body")]
    EmptyBody,
}

/// Result type alias for GastroMiner operations
pub type Result<T> = std::result::Result<T, GastroError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use record::{FieldMapping, Header, Row};
pub use state::RunPhase;

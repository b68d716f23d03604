//! Configuration module for GastroMiner
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A run needs no file at all: [`Config::default`] targets the public BEDCA
//! service with the stock column schema.
//!
//! # Example
//!
//! ```no_run
//! use gastrominer::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("gastrominer.toml")).unwrap();
//! println!("Writing to: {}", config.output.csv_path);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AgentConfig, Config, EndpointConfig, EngineConfig, OutputConfig, SchemaConfig,
    DEFAULT_CSV_PATH, DEFAULT_DETAIL_FIELDS, DEFAULT_ENDPOINT_URL, DEFAULT_PRIMARY_FIELDS,
    DEFAULT_ROBOTS_URL,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;

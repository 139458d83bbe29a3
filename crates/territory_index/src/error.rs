//! Error types for the territory index.
//!
//! Queries never fail: a lookup that finds nothing returns an empty list or
//! `None`. The only fallible paths are configuration loading and validation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

//! Index and cache configuration.
//!
//! Every field has a serde default so partial TOML tables are accepted, the
//! same way the server's own settings files are.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default maximum number of entries per query-shape cache.
pub const DEFAULT_MAX_CACHE_ENTRIES: usize = 1000;

/// Default time-to-live for a cached query result (5 minutes).
pub const DEFAULT_CACHE_TTL_MS: u64 = 300_000;

fn default_enabled() -> bool {
    true
}
fn default_max_entries() -> usize {
    DEFAULT_MAX_CACHE_ENTRIES
}
fn default_ttl_ms() -> u64 {
    DEFAULT_CACHE_TTL_MS
}

/// Complete territory index configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Query cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Query cache configuration, shared by all seven query shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether reads are memoized at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Maximum entries held per query shape
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    /// Entry lifetime in milliseconds
    #[serde(default = "default_ttl_ms")]
    pub ttl_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_entries: default_max_entries(),
            ttl_ms: default_ttl_ms(),
        }
    }
}

impl CacheConfig {
    /// Cache configuration with memoization turned off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    #[inline]
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

impl IndexConfig {
    /// Parses a configuration from TOML text and validates it.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: IndexConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Checks the configuration for values the index cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.max_entries == 0 {
            return Err(ConfigError::Invalid(
                "cache.max_entries must be greater than 0".to_string(),
            ));
        }

        if self.cache.ttl_ms == 0 {
            return Err(ConfigError::Invalid(
                "cache.ttl_ms must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

//! Configuration management for the territory diagnostics driver.
//!
//! This module handles loading, validation, and conversion of the driver
//! configuration from TOML files and command-line arguments.

use serde::{Deserialize, Serialize};
use std::path::Path;
use territory_index::IndexConfig;
use tracing::info;

fn default_worlds() -> Vec<String> {
    vec!["world".to_string(), "world_nether".to_string()]
}
fn default_owners() -> usize { 4 }
fn default_grid_size() -> u32 { 8 }
fn default_spacing() -> u32 { 4 }
fn default_tick_interval_ms() -> u64 {
    50 // 20 ticks per second
}
fn default_max_ticks() -> u64 { 0 }
fn default_sweep_interval_ms() -> u64 { 30_000 }
fn default_stats_interval_ticks() -> u64 { 200 }

/// Largest territory edge, in cells, the workload generator accepts.
const MAX_GRID_SIZE: u32 = 1024;
/// Largest distance between neighbouring cells the workload generator accepts.
const MAX_SPACING: u32 = 64;
const MAX_OWNERS: usize = 1024;

/// Application configuration loaded from TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Territory index and query cache settings
    #[serde(default)]
    pub index: IndexConfig,
    /// Logging configuration settings
    #[serde(default)]
    pub logging: LoggingSettings,
    /// Synthetic workload settings
    #[serde(default)]
    pub workload: WorkloadSettings,
}

/// Logging system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    pub level: String,
    /// Whether to output logs in JSON format
    pub json_format: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Shape and pacing of the synthetic workload.
///
/// Every owner gets a square territory of `grid_size` x `grid_size` cells,
/// `spacing` blocks apart, in every world. Territories sit side by side
/// along the x axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadSettings {
    /// Worlds to populate
    #[serde(default = "default_worlds")]
    pub worlds: Vec<String>,
    /// Number of owners (clans) holding territory
    #[serde(default = "default_owners")]
    pub owners: usize,
    /// Territory edge length in cells
    #[serde(default = "default_grid_size")]
    pub grid_size: u32,
    /// Blocks between neighbouring cells
    #[serde(default = "default_spacing")]
    pub spacing: u32,
    /// Milliseconds between query ticks
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Ticks to run before stopping on its own, 0 runs until a shutdown signal
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
    /// Milliseconds between expired cache entry sweeps
    #[serde(default = "default_sweep_interval_ms")]
    pub sweep_interval_ms: u64,
    /// Ticks between statistics reports
    #[serde(default = "default_stats_interval_ticks")]
    pub stats_interval_ticks: u64,
}

impl Default for WorkloadSettings {
    fn default() -> Self {
        Self {
            worlds: default_worlds(),
            owners: default_owners(),
            grid_size: default_grid_size(),
            spacing: default_spacing(),
            tick_interval_ms: default_tick_interval_ms(),
            max_ticks: default_max_ticks(),
            sweep_interval_ms: default_sweep_interval_ms(),
            stats_interval_ticks: default_stats_interval_ticks(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// If the file doesn't exist, a default configuration is written there
    /// and returned.
    pub async fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            let content = tokio::fs::read_to_string(path).await?;
            let config: AppConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let default_config = AppConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            tokio::fs::write(path, toml_content).await?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    /// Index configuration handed to [`territory_index::TerritoryIndex::with_config`].
    pub fn to_index_config(&self) -> IndexConfig {
        self.index.clone()
    }

    /// Validates the configuration for common errors.
    pub fn validate(&self) -> Result<(), String> {
        self.index.validate().map_err(|e| e.to_string())?;

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                &self.logging.level
            ));
        }

        let workload = &self.workload;
        if workload.worlds.is_empty() {
            return Err("workload.worlds must name at least one world".to_string());
        }
        if workload.worlds.iter().any(|world| world.is_empty()) {
            return Err("workload.worlds cannot contain an empty world name".to_string());
        }
        if workload.owners == 0 || workload.owners > MAX_OWNERS {
            return Err(format!("workload.owners must be between 1 and {MAX_OWNERS}"));
        }
        if workload.grid_size == 0 || workload.grid_size > MAX_GRID_SIZE {
            return Err(format!("workload.grid_size must be between 1 and {MAX_GRID_SIZE}"));
        }
        if workload.spacing == 0 || workload.spacing > MAX_SPACING {
            return Err(format!("workload.spacing must be between 1 and {MAX_SPACING}"));
        }
        if workload.tick_interval_ms == 0 {
            return Err("workload.tick_interval_ms must be greater than 0".to_string());
        }
        if workload.sweep_interval_ms == 0 {
            return Err("workload.sweep_interval_ms must be greater than 0".to_string());
        }
        if workload.stats_interval_ticks == 0 {
            return Err("workload.stats_interval_ticks must be greater than 0".to_string());
        }

        Ok(())
    }
}

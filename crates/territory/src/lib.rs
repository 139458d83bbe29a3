//! # Territory Index Diagnostics Driver
//!
//! Seeds a deterministic synthetic workload of placed territory blocks into a
//! [`territory_index::TerritoryIndex`], replays a query mix every tick and
//! reports index and cache statistics.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run with default configuration (created as territory.toml if missing)
//! territory
//!
//! # Run 1000 ticks against a larger territory with debug logs
//! territory --ticks 1000 --grid 32 --log-level debug
//!
//! # Compare against the uncached query path
//! territory --ticks 1000 --no-cache
//! ```
//!
//! ## Signal Handling
//!
//! The driver stops gracefully on SIGINT (Ctrl+C) and SIGTERM; a second signal
//! exits immediately.

use tracing::error;

mod app;
mod cli;
mod config;
mod logging;
mod signals;
mod workload;

use app::Application;
use cli::CliArgs;
use config::AppConfig;

/// Entry point for the `territory` binary.
///
/// 1. Command-line argument parsing
/// 2. Configuration loading
/// 3. Logging system initialization
/// 4. Application creation and execution
///
/// Exits the process with status 1 on any startup or runtime failure.
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Load configuration to get logging settings
    let mut log_settings = AppConfig::load_from_file(&args.config_path)
        .await
        .unwrap_or_default()
        .logging;
    if let Some(level) = &args.log_level {
        log_settings.level = level.clone();
    }

    if let Err(e) = logging::setup_logging(&log_settings, args.json_logs) {
        eprintln!("❌ Failed to setup logging: {e}");
        std::process::exit(1);
    }

    match Application::new(args).await {
        Ok(app) => {
            if let Err(e) = app.run().await {
                error!("❌ Application error: {:?}", e);
                std::process::exit(1);
            }
        }
        Err(e) => {
            error!("❌ Failed to start application: {e:?}");
            std::process::exit(1);
        }
    }

    Ok(())
}

pub use app::StopReason;
pub use config::{LoggingSettings, WorkloadSettings};
pub use workload::{TickReport, Workload};

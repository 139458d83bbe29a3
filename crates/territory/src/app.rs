//! Main application logic and lifecycle management.
//!
//! The [`Application`] seeds the workload, drives the tick loop, runs the
//! background cache sweep and reports statistics until it is told to stop.

use crate::{
    cli::CliArgs,
    config::AppConfig,
    logging::display_banner,
    signals::{setup_signal_handlers, setup_signal_handlers_silent},
    workload::Workload,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use territory_index::{CacheConfig, TerritoryIndex};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

/// Why the tick loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The configured tick budget ran out
    TickLimit,
    /// A termination signal arrived
    Signal,
}

/// Main application struct.
pub struct Application {
    /// Loaded application configuration
    config: AppConfig,
    /// The index under test
    index: Arc<TerritoryIndex>,
}

impl Application {
    /// Creates a new application instance.
    ///
    /// # Process
    ///
    /// 1. Load configuration from file (creating default if missing)
    /// 2. Apply command-line argument overrides
    /// 3. Validate merged configuration
    /// 4. Build the territory index
    pub async fn new(args: CliArgs) -> Result<Self, Box<dyn std::error::Error>> {
        info!("🔧 Loading configuration from: {}", args.config_path.display());
        let mut config = AppConfig::load_from_file(&args.config_path).await?;

        if let Some(log_level) = args.log_level {
            config.logging.level = log_level;
        }

        if args.json_logs {
            config.logging.json_format = true;
        }

        if let Some(max_ticks) = args.max_ticks {
            config.workload.max_ticks = max_ticks;
        }

        if let Some(grid_size) = args.grid_size {
            config.workload.grid_size = grid_size;
        }

        if args.no_cache {
            config.index.cache = CacheConfig::disabled();
        }

        Self::from_config(config)
    }

    /// Creates an application from an already merged configuration.
    pub fn from_config(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        if let Err(e) = config.validate() {
            return Err(format!("Configuration validation failed: {e}").into());
        }
        info!("✅ Configuration loaded and validated successfully");

        let index = Arc::new(TerritoryIndex::with_config(config.to_index_config()));
        Ok(Self { config, index })
    }

    /// Runs the workload until the tick budget runs out or a signal arrives.
    pub async fn run(self) -> Result<StopReason, Box<dyn std::error::Error>> {
        self.run_until(setup_signal_handlers()).await
    }

    /// Runs the workload until the tick budget runs out or `shutdown`
    /// resolves. An error from `shutdown` stops the sweep and is returned.
    pub async fn run_until<F>(self, shutdown: F) -> Result<StopReason, Box<dyn std::error::Error>>
    where
        F: Future<Output = Result<(), Box<dyn std::error::Error>>>,
    {
        display_banner();
        self.log_configuration_summary();

        let workload = Workload::seed(&self.index, &self.config.workload);
        info!("📊 Initial Index State:");
        self.index.log_statistics();

        let sweep_handle = self.spawn_cache_sweep();

        info!("✅ Territory workload is now running!");
        info!("🛑 Press Ctrl+C to stop");

        tokio::pin!(shutdown);

        let settings = &self.config.workload;
        let mut ticker = tokio::time::interval(Duration::from_millis(settings.tick_interval_ms));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut tick: u64 = 0;
        let mut queries: usize = 0;
        let mut blocks_seen: usize = 0;
        let mut churns: usize = 0;

        let reason = loop {
            if settings.max_ticks > 0 && tick >= settings.max_ticks {
                break StopReason::TickLimit;
            }

            tokio::select! {
                result = &mut shutdown => {
                    if let Err(e) = result {
                        sweep_handle.abort();
                        return Err(e);
                    }
                    break StopReason::Signal;
                }
                _ = ticker.tick() => {
                    let report = workload.run_tick(&self.index, tick);
                    queries += report.queries;
                    blocks_seen += report.blocks_seen;
                    churns += usize::from(report.churned);
                    tick += 1;

                    if tick % settings.stats_interval_ticks == 0 {
                        info!(
                            "📊 Tick {} - {} queries | {} blocks returned | {} churns",
                            tick, queries, blocks_seen, churns
                        );
                        self.index.log_statistics();
                    }
                }
            }
        };

        // a second signal while shutting down exits immediately
        let merciless = tokio::spawn(async move {
            if let Err(e) = setup_signal_handlers_silent().await {
                error!("Failed to set up merciless shutdown signal handler: {e}");
                return;
            }

            warn!("Shutdown handler received again! I'll make this quick.");
            std::process::exit(1);
        });

        info!("🛑 Stopping after {} ticks ({:?})", tick, reason);
        sweep_handle.abort();

        self.log_final_statistics(tick, queries, blocks_seen);
        merciless.abort();

        info!("✅ Territory workload shutdown complete");
        Ok(reason)
    }

    /// Starts the periodic expired-entry sweep.
    fn spawn_cache_sweep(&self) -> tokio::task::JoinHandle<()> {
        let index = Arc::clone(&self.index);
        let period = Duration::from_millis(self.config.workload.sweep_interval_ms);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // the first tick completes immediately
            interval.tick().await;

            loop {
                interval.tick().await;
                let purged = index.purge_expired_cache();
                if purged > 0 {
                    info!("🧹 Cache sweep dropped {} expired entries", purged);
                }
            }
        })
    }

    /// Logs the configuration summary at startup.
    fn log_configuration_summary(&self) {
        let workload = &self.config.workload;
        let cache = &self.config.index.cache;
        info!("📋 Configuration Summary:");
        info!("  🌍 Worlds: {}", workload.worlds.join(", "));
        info!(
            "  🏰 Territories: {} owners, {}x{} cells, {} blocks apart",
            workload.owners, workload.grid_size, workload.grid_size, workload.spacing
        );
        info!(
            "  ⏱️ Tick interval: {}ms, limit: {}",
            workload.tick_interval_ms,
            if workload.max_ticks == 0 { "none".to_string() } else { workload.max_ticks.to_string() }
        );
        if cache.enabled {
            info!(
                "  🗃️ Query cache: {} entries per shape, {}ms TTL, sweep every {}ms",
                cache.max_entries, cache.ttl_ms, workload.sweep_interval_ms
            );
        } else {
            info!("  🗃️ Query cache: disabled");
        }
    }

    /// Logs final statistics, including a JSON snapshot of both counters.
    fn log_final_statistics(&self, ticks: u64, queries: usize, blocks_seen: usize) {
        info!("📊 Final Statistics:");
        info!("  - Ticks run: {}", ticks);
        info!("  - Queries issued: {}", queries);
        info!("  - Blocks returned: {}", blocks_seen);
        self.index.log_statistics();

        match serde_json::to_string_pretty(&self.index.get_statistics()) {
            Ok(json) => info!("📄 Index statistics:\n{}", json),
            Err(e) => warn!("Failed to serialize index statistics: {e}"),
        }
        match serde_json::to_string_pretty(&self.index.cache_statistics()) {
            Ok(json) => info!("📄 Cache statistics:\n{}", json),
            Err(e) => warn!("Failed to serialize cache statistics: {e}"),
        }
    }

    pub fn index(&self) -> &Arc<TerritoryIndex> {
        &self.index
    }
}

/// Statistics and cache maintenance
use super::core::TerritoryIndex;
use crate::cache::CacheStatistics;
use crate::index::IndexStatistics;
use crate::types::BlockCategory;
use tracing::{debug, info};

impl TerritoryIndex {
    /// Snapshot of the index contents.
    pub fn get_statistics(&self) -> IndexStatistics {
        self.store.statistics()
    }

    /// Snapshot of the per-shape cache counters.
    pub fn cache_statistics(&self) -> CacheStatistics {
        self.cache.statistics()
    }

    /// Logs index and cache statistics at info level.
    pub fn log_statistics(&self) {
        let stats = self.get_statistics();
        info!(
            "📊 Territory index: {} blocks in {} chunks across {} worlds",
            stats.total_blocks, stats.total_chunks, stats.total_worlds
        );
        for category in BlockCategory::ALL {
            info!("   {}: {}", category, stats.count(category));
        }

        if !self.caching_enabled() {
            info!("📊 Query cache disabled");
            return;
        }

        let cache = self.cache_statistics();
        info!(
            "📊 Query cache: {} entries, {} hits, {} misses ({:.1}% hit rate), generation {}",
            cache.total_entries(),
            cache.total_hits(),
            cache.total_misses(),
            cache.hit_rate() * 100.0,
            cache.generation
        );
        for shape in &cache.shapes {
            debug!(
                "   {}: {}/{} entries, {} evictions, {} expirations",
                shape.name, shape.entries, shape.max_entries, shape.evictions, shape.expirations
            );
        }
    }

    /// Sweeps expired entries out of the query cache.
    ///
    /// Expired entries are also dropped lazily on read; this reclaims memory
    /// for keys that are never asked for again.
    pub fn purge_expired_cache(&self) -> usize {
        let purged = self.cache.purge_expired();
        if purged > 0 {
            debug!("🗑️ Purged {} expired cache entries", purged);
        }
        purged
    }

    /// Number of indexed blocks.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

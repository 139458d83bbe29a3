//! Query result caching
//!
//! Every query shape gets its own bounded, time-limited map. Any structural
//! change to the index invalidates all of them at once (coarse invalidation):
//! simple, and a cached result can never outlive the index state it was
//! computed from.
//!
//! ## Fill protocol
//!
//! A read captures the cache [`generation`](QueryCache::generation) *before*
//! computing its result and hands it back to [`QueryCache::fill`]. The fill is
//! dropped if a mutation bumped the generation in the meantime. Together with
//! [`QueryCache::clear_all`] clearing each shape under that shape's gate, this
//! means a result computed against an older index state is never left in the
//! cache after the invalidation that followed the change.

mod entry;
mod keys;
mod shape;
mod stats;

pub use entry::CacheEntry;
pub use keys::{AdjacentKey, ChunkKey, DirectionKey, ExactKey, NearestKey, OwnerKey, RadiusKey};
pub use shape::ShapeCache;
pub use stats::{CacheStatistics, ShapeStatistics};

use crate::block::BlockRef;
use crate::config::CacheConfig;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// The seven per-shape caches plus the shared invalidation generation.
#[derive(Debug)]
pub struct QueryCache {
    generation: AtomicU64,
    pub(crate) exact: ShapeCache<ExactKey, Option<BlockRef>>,
    pub(crate) chunk: ShapeCache<ChunkKey, Vec<BlockRef>>,
    pub(crate) radius: ShapeCache<RadiusKey, Vec<BlockRef>>,
    pub(crate) direction: ShapeCache<DirectionKey, Vec<BlockRef>>,
    pub(crate) adjacent: ShapeCache<AdjacentKey, Vec<BlockRef>>,
    pub(crate) nearest: ShapeCache<NearestKey, Option<BlockRef>>,
    pub(crate) owner: ShapeCache<OwnerKey, Vec<BlockRef>>,
}

impl QueryCache {
    pub fn new(config: &CacheConfig) -> Self {
        let max = config.max_entries;
        let ttl = config.ttl();
        Self {
            generation: AtomicU64::new(0),
            exact: ShapeCache::new("exact", max, ttl),
            chunk: ShapeCache::new("chunk", max, ttl),
            radius: ShapeCache::new("radius", max, ttl),
            direction: ShapeCache::new("direction", max, ttl),
            adjacent: ShapeCache::new("adjacent", max, ttl),
            nearest: ShapeCache::new("nearest", max, ttl),
            owner: ShapeCache::new("owner", max, ttl),
        }
    }

    /// Current invalidation generation; capture it before computing a fill.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Stores a computed result unless the index changed since `observed`.
    pub fn fill<K, V>(&self, shape: &ShapeCache<K, V>, observed: u64, key: K, value: V) -> bool
    where
        K: Eq + Hash + Clone,
        V: Clone,
    {
        let stored = shape.insert_unless(key, value, || self.generation() != observed);
        if !stored {
            trace!("⏭️ Skipped stale {} cache fill", shape.name());
        }
        stored
    }

    /// Invalidates every cached result.
    pub fn clear_all(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.exact.clear();
        self.chunk.clear();
        self.radius.clear();
        self.direction.clear();
        self.adjacent.clear();
        self.nearest.clear();
        self.owner.clear();
    }

    /// Sweeps expired entries out of every shape, returning how many went.
    pub fn purge_expired(&self) -> usize {
        self.exact.purge_expired()
            + self.chunk.purge_expired()
            + self.radius.purge_expired()
            + self.direction.purge_expired()
            + self.adjacent.purge_expired()
            + self.nearest.purge_expired()
            + self.owner.purge_expired()
    }

    /// Total entries across all shapes.
    pub fn len(&self) -> usize {
        self.exact.len()
            + self.chunk.len()
            + self.radius.len()
            + self.direction.len()
            + self.adjacent.len()
            + self.nearest.len()
            + self.owner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn statistics(&self) -> CacheStatistics {
        CacheStatistics {
            generation: self.generation(),
            shapes: vec![
                self.exact.statistics(),
                self.chunk.statistics(),
                self.radius.statistics(),
                self.direction.statistics(),
                self.adjacent.statistics(),
                self.nearest.statistics(),
                self.owner.statistics(),
            ],
        }
    }
}

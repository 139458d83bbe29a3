/// Core TerritoryIndex implementation
use crate::cache::{QueryCache, ShapeCache};
use crate::config::IndexConfig;
use crate::index::{IndexStore, QueryEngine};
use std::hash::Hash;

/// The public façade external collaborators talk to.
///
/// Combines the [`IndexStore`], the [`QueryEngine`] built on top of it and the
/// [`QueryCache`] in front of both. Every write goes to the store and then
/// invalidates the whole cache; every read is answered from the cache when
/// possible and computed (then cached) otherwise.
///
/// `TerritoryIndex` is `Send + Sync`; share it behind an `Arc` to query from
/// several threads.
///
/// # Examples
///
/// ```rust
/// use territory_index::{BlockCategory, BlockLocation, OwnerId, PlacedBlock, TerritoryIndex};
///
/// let index = TerritoryIndex::new();
/// let clan = OwnerId::new();
/// let at = BlockLocation::new("world", 0, 64, 0);
///
/// index.add_block(PlacedBlock::core(at.clone(), clan).into_ref());
///
/// assert!(index.get_block_at(&at, Some(BlockCategory::Core)).is_some());
/// assert!(index.get_block_at(&at, Some(BlockCategory::Claim)).is_none());
/// assert_eq!(index.get_blocks_by_owner(clan, None).len(), 1);
/// ```
#[derive(Debug)]
pub struct TerritoryIndex {
    pub(super) store: IndexStore,
    pub(super) cache: QueryCache,
    pub(super) config: IndexConfig,
}

impl TerritoryIndex {
    /// Creates an empty index with default cache settings
    /// (1000 entries per shape, 5 minute TTL).
    pub fn new() -> Self {
        Self::with_config(IndexConfig::default())
    }

    /// Creates an empty index with the given configuration.
    pub fn with_config(config: IndexConfig) -> Self {
        Self {
            store: IndexStore::new(),
            cache: QueryCache::new(&config.cache),
            config,
        }
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Whether reads are memoized.
    #[inline]
    pub fn caching_enabled(&self) -> bool {
        self.config.cache.enabled
    }

    #[inline]
    pub(crate) fn engine(&self) -> QueryEngine<'_> {
        QueryEngine::new(&self.store)
    }

    /// Answers a read from `shape`, or computes it and fills `shape`.
    pub(super) fn read_through<K, V>(
        &self,
        shape: &ShapeCache<K, V>,
        key: K,
        compute: impl FnOnce() -> V,
    ) -> V
    where
        K: Eq + Hash + Clone,
        V: Clone,
    {
        if !self.caching_enabled() {
            return compute();
        }

        if let Some(hit) = shape.get(&key) {
            return hit;
        }

        let observed = self.cache.generation();
        let value = compute();
        self.cache.fill(shape, observed, key, value.clone());
        value
    }
}

impl Default for TerritoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

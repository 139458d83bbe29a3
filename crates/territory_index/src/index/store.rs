/// Chunk-bucketed block storage
use super::stats::IndexStatistics;
use crate::block::BlockRef;
use crate::types::{categories_for, BlockCategory, BlockLocation, ChunkCoordinate};
use compact_str::CompactString;
use dashmap::DashMap;
use smallvec::SmallVec;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

/// Compound key of a single bucket: one category inside one chunk of one world.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketKey {
    pub world: CompactString,
    pub chunk: ChunkCoordinate,
    pub category: BlockCategory,
}

impl BucketKey {
    pub fn new(world: impl Into<CompactString>, chunk: ChunkCoordinate, category: BlockCategory) -> Self {
        Self {
            world: world.into(),
            chunk,
            category,
        }
    }

    /// Bucket a block at `location` with `category` is filed under.
    pub fn for_location(location: &BlockLocation, category: BlockCategory) -> Self {
        Self {
            world: location.world.clone(),
            chunk: location.chunk(),
            category,
        }
    }
}

/// A stored block together with its insertion sequence number.
///
/// Sequence numbers only ever grow, so sorting by them reproduces insertion
/// order across buckets.
#[derive(Debug, Clone)]
pub(crate) struct IndexedEntry {
    pub seq: u64,
    pub block: BlockRef,
}

/// Most buckets hold a handful of blocks; keep those inline.
type Bucket = SmallVec<[IndexedEntry; 4]>;

/// The authoritative membership structure.
///
/// A single flat concurrent map from [`BucketKey`] to the blocks in that bucket.
/// Every add and remove runs while holding that bucket's map entry, so two
/// writers racing on the same bucket can neither duplicate a block nor lose a
/// removal. Buckets that become empty are dropped with an atomic
/// remove-if-empty, so no empty container is ever left behind.
#[derive(Debug, Default)]
pub struct IndexStore {
    buckets: DashMap<BucketKey, Bucket>,
    next_seq: AtomicU64,
}

impl IndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a block to its bucket.
    ///
    /// Returns `false` without touching the index when a block with the same
    /// coordinates is already filed under the same category, or when the block
    /// has no world.
    pub fn add(&self, block: BlockRef) -> bool {
        let location = block.location();
        if !location.is_valid() {
            warn!("⚠️ Refusing to index block without a world: {:?}", block);
            return false;
        }

        let key = BucketKey::for_location(location, block.category());
        let mut bucket = self.buckets.entry(key).or_default();
        if bucket
            .iter()
            .any(|entry| entry.block.location().same_block(location))
        {
            return false;
        }

        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        bucket.push(IndexedEntry { seq, block });
        true
    }

    /// Removes the block at `location` filed under `category`.
    ///
    /// Returns whether anything was removed.
    pub fn remove(&self, location: &BlockLocation, category: BlockCategory) -> bool {
        if !location.is_valid() {
            return false;
        }

        let key = BucketKey::for_location(location, category);
        let removed = match self.buckets.get_mut(&key) {
            Some(mut bucket) => {
                let before = bucket.len();
                bucket.retain(|entry| !entry.block.location().same_block(location));
                bucket.len() != before
            }
            None => false,
        };

        if removed {
            // The guard above is released; re-check emptiness under the entry lock
            // so a concurrent add into this bucket is never discarded.
            self.buckets.remove_if(&key, |_, bucket| bucket.is_empty());
        }

        removed
    }

    /// Finds the block at exactly `location`.
    ///
    /// With `category = None` every category bucket of the chunk is checked in
    /// [`BlockCategory::ALL`] order and the first hit wins. If two categories
    /// occupy the same coordinate the earlier category shadows the later one.
    pub fn exact_lookup(
        &self,
        location: &BlockLocation,
        category: Option<BlockCategory>,
    ) -> Option<BlockRef> {
        if !location.is_valid() {
            return None;
        }

        let chunk = location.chunk();
        categories_for(category).iter().find_map(|&category| {
            let key = BucketKey::new(location.world.clone(), chunk, category);
            self.buckets.get(&key).and_then(|bucket| {
                bucket
                    .iter()
                    .find(|entry| entry.block.location().same_block(location))
                    .map(|entry| entry.block.clone())
            })
        })
    }

    /// Returns the blocks of one chunk.
    ///
    /// With `category = None` the category buckets are concatenated in
    /// [`BlockCategory::ALL`] order; each bucket keeps insertion order.
    pub fn bucket(
        &self,
        world: &str,
        chunk: ChunkCoordinate,
        category: Option<BlockCategory>,
    ) -> Vec<BlockRef> {
        let mut entries = Vec::new();
        self.collect_chunk(world, chunk, category, &mut entries);
        entries.into_iter().map(|entry| entry.block).collect()
    }

    /// Appends the entries of one chunk to `out`.
    pub(crate) fn collect_chunk(
        &self,
        world: &str,
        chunk: ChunkCoordinate,
        category: Option<BlockCategory>,
        out: &mut Vec<IndexedEntry>,
    ) {
        if world.is_empty() {
            return;
        }

        for &category in categories_for(category) {
            let key = BucketKey::new(world, chunk, category);
            if let Some(bucket) = self.buckets.get(&key) {
                out.extend(bucket.iter().cloned());
            }
        }
    }

    /// Visits every bucket. Visit order is unspecified.
    pub(crate) fn for_each_bucket(&self, mut visit: impl FnMut(&BucketKey, &[IndexedEntry])) {
        for bucket in self.buckets.iter() {
            visit(bucket.key(), bucket.value());
        }
    }

    /// Number of non-empty buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Total number of indexed blocks.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Drops every bucket.
    pub fn clear(&self) {
        self.buckets.clear();
    }

    /// Clears the index and re-adds `blocks`, returning how many were indexed.
    ///
    /// Duplicates inside `blocks` collapse the same way repeated [`add`](Self::add)
    /// calls do.
    pub fn rebuild(&self, blocks: impl IntoIterator<Item = BlockRef>) -> usize {
        self.clear();
        blocks
            .into_iter()
            .filter(|block| self.add(block.clone()))
            .count()
    }

    /// Counts blocks, chunks, worlds and blocks per category.
    pub fn statistics(&self) -> IndexStatistics {
        let mut stats = IndexStatistics::empty();
        let mut chunks: HashSet<(CompactString, ChunkCoordinate)> = HashSet::new();
        let mut worlds: HashSet<CompactString> = HashSet::new();

        for bucket in self.buckets.iter() {
            let key = bucket.key();
            let count = bucket.value().len();
            if count == 0 {
                continue;
            }

            stats.total_blocks += count;
            *stats.blocks_by_category.entry(key.category).or_insert(0) += count;
            chunks.insert((key.world.clone(), key.chunk));
            worlds.insert(key.world.clone());
        }

        stats.total_chunks = chunks.len();
        stats.total_worlds = worlds.len();
        stats
    }
}

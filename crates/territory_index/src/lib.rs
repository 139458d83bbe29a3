//! # Territory Index
//!
//! A chunk-bucketed spatial index for placed territory blocks (cores, claims,
//! defenses, doors and outside markers) with a bounded, time-limited query
//! cache in front of it.
//!
//! ## Core Features
//!
//! - **Chunk Buckets**: Blocks are filed by world, 16x16 chunk and category, so
//!   locality queries only visit the buckets around the point of interest
//! - **Seven Query Shapes**: Exact, chunk, radius, direction, adjacency,
//!   nearest and by-owner lookups
//! - **Query Cache**: Every shape is memoized with a per-shape entry bound and
//!   TTL; any structural change invalidates all of it
//! - **Thread Safety**: Concurrent readers and writers, with no cached result
//!   outliving the change that made it stale
//! - **Deterministic Results**: Ties and multi-result queries follow insertion
//!   order
//!
//! ## Architecture Overview
//!
//! - [`IndexStore`] owns the buckets and is the only mutable state
//! - [`QueryEngine`] answers the seven query shapes straight from the store
//! - [`QueryCache`] memoizes query results per shape
//! - [`TerritoryIndex`] is the façade combining the three; most callers only
//!   ever need this type
//!
//! ## Quick Start Example
//!
//! ```rust
//! use territory_index::*;
//!
//! let index = TerritoryIndex::new();
//! let clan = OwnerId::new();
//!
//! let core = BlockLocation::new("overworld", 100, 64, 100);
//! index.add_block(PlacedBlock::core(core.clone(), clan).into_ref());
//! index.add_block(PlacedBlock::defense(BlockLocation::new("overworld", 105, 64, 100), clan).into_ref());
//!
//! let defenses = index.get_blocks_in_radius(&core, 10, Some(BlockCategory::Defense));
//! assert_eq!(defenses.len(), 1);
//!
//! let nearest = index.get_nearest_block(&core, Some(BlockCategory::Defense), 50);
//! assert_eq!(nearest.map(|b| b.location().x), Some(105));
//!
//! index.remove_block(&core, BlockCategory::Core);
//! assert!(index.get_block_at(&core, None).is_none());
//! ```

pub mod block;
pub mod cache;
pub mod config;
pub mod error;
pub mod index;
pub mod manager;
pub mod types;

#[cfg(test)]
mod tests;

pub use block::{same_block, BlockRef, IndexedBlock, PlacedBlock};
pub use cache::{CacheStatistics, QueryCache, ShapeCache, ShapeStatistics};
pub use config::{CacheConfig, IndexConfig};
pub use error::ConfigError;
pub use index::{BucketKey, IndexStatistics, IndexStore, QueryEngine};
pub use manager::TerritoryIndex;
pub use types::*;

/// Statistics tracking for the index store
use crate::types::BlockCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Snapshot of what the index currently holds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStatistics {
    /// Total number of indexed blocks
    pub total_blocks: usize,
    /// Number of distinct (world, chunk) cells holding at least one block
    pub total_chunks: usize,
    /// Number of worlds holding at least one block
    pub total_worlds: usize,
    /// Block count per category; every category is present, zero included
    pub blocks_by_category: BTreeMap<BlockCategory, usize>,
}

impl IndexStatistics {
    /// Statistics of an empty index, with a zero entry for every category.
    pub fn empty() -> Self {
        Self {
            blocks_by_category: BlockCategory::ALL.iter().map(|&c| (c, 0)).collect(),
            ..Self::default()
        }
    }

    /// Blocks filed under `category`.
    pub fn count(&self, category: BlockCategory) -> usize {
        self.blocks_by_category.get(&category).copied().unwrap_or(0)
    }

    /// Whether every counter is zero.
    pub fn is_empty(&self) -> bool {
        self.total_blocks == 0
            && self.total_chunks == 0
            && self.total_worlds == 0
            && self.blocks_by_category.values().all(|&count| count == 0)
    }
}

//! Behavioural tests for the territory index façade
//!
//! - Scenario tests for every query shape and the index properties
//! - Cache transparency against an uncached index fed the same operations
//! - Concurrency tests racing writers and readers on shared buckets



#[cfg(test)]
pub mod scenarios;

use crate::block::{BlockRef, PlacedBlock};
use crate::types::{BlockCategory, BlockLocation, OwnerId};

pub(crate) const WORLD: &str = "w";

pub(crate) fn at(x: i32, y: i32, z: i32) -> BlockLocation {
    BlockLocation::new(WORLD, x, y, z)
}

pub(crate) fn block(category: BlockCategory, location: BlockLocation, owner: OwnerId) -> BlockRef {
    PlacedBlock::new(location, category, owner).into_ref()
}

/// Content of a result list, comparable across two indexes.
pub(crate) fn describe(blocks: &[BlockRef]) -> Vec<(BlockLocation, BlockCategory, OwnerId)> {
    blocks
        .iter()
        .map(|b| (b.location().clone(), b.category(), b.owner()))
        .collect()
}

pub(crate) fn describe_one(block: &Option<BlockRef>) -> Option<(BlockLocation, BlockCategory, OwnerId)> {
    block
        .as_ref()
        .map(|b| (b.location().clone(), b.category(), b.owner()))
}

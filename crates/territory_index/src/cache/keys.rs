//! One key type per query shape.
//!
//! Each shape has its own cache map, so identical fields in two key types
//! (exact vs. adjacent lookups) can never collide.

use crate::types::{BlockCategory, BlockLocation, ChunkCoordinate, Direction, OwnerId};
use compact_str::CompactString;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExactKey {
    pub location: BlockLocation,
    pub category: Option<BlockCategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChunkKey {
    pub world: CompactString,
    pub chunk: ChunkCoordinate,
    pub category: Option<BlockCategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RadiusKey {
    pub center: BlockLocation,
    pub radius: i32,
    pub category: Option<BlockCategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectionKey {
    pub origin: BlockLocation,
    pub direction: Direction,
    pub distance: i32,
    pub category: Option<BlockCategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AdjacentKey {
    pub location: BlockLocation,
    pub category: Option<BlockCategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NearestKey {
    pub location: BlockLocation,
    pub category: Option<BlockCategory>,
    pub max_distance: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerKey {
    pub owner: OwnerId,
    pub category: Option<BlockCategory>,
}

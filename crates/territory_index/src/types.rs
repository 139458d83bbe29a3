//! # Core Type Definitions
//!
//! This module contains the value types every other part of the index is built
//! from: block coordinates, chunk keys, block categories, probe directions and
//! owner identities.
//!
//! ## Key Types
//!
//! - [`OwnerId`] - Opaque identity of whoever owns a placed block (usually a clan)
//! - [`BlockLocation`] - Integer block coordinate inside a named world
//! - [`ChunkCoordinate`] - 16x16 horizontal bucket a location falls into
//! - [`BlockCategory`] - Role tag of an indexed block
//! - [`Direction`] - The ten fixed probe offsets used by ray and adjacency scans
//!
//! All types are plain values: they hash and compare by content and can be
//! freely cloned into cache keys.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Width of a chunk along the x and z axes, in blocks.
pub const CHUNK_SIZE: i32 = 16;

/// Shift that converts a block coordinate into a chunk coordinate.
pub const CHUNK_SHIFT: u32 = 4;

// ============================================================================
// Owner identity
// ============================================================================

/// Unique identifier for the owner of a placed block.
///
/// The index treats owners as opaque: it only compares them for equality when
/// answering by-owner queries. Territory rules decide what an owner *means*.
///
/// # Examples
///
/// ```rust
/// use territory_index::OwnerId;
///
/// let clan = OwnerId::new();
/// let parsed: OwnerId = "550e8400-e29b-41d4-a716-446655440000".parse()?;
/// println!("Owner: {}", parsed);
/// # let _ = clan;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OwnerId(pub Uuid);

impl OwnerId {
    /// Creates a new random owner ID using UUID v4.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Builds an owner ID from an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl std::str::FromStr for OwnerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl Default for OwnerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Locations and chunks
// ============================================================================

/// Integer block coordinate inside a named world.
///
/// Two locations are the same block when world name and all three coordinates
/// match. This is the identity the index uses for de-duplication and exact
/// lookups.
///
/// # Examples
///
/// ```rust
/// use territory_index::{BlockLocation, ChunkCoordinate};
///
/// let core = BlockLocation::new("world", 1, 64, -3);
/// assert_eq!(core.chunk(), ChunkCoordinate::new(0, -1));
/// assert_eq!(core.distance_squared(&BlockLocation::new("world", 4, 64, 1)), 25);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockLocation {
    /// Name of the world the block lives in
    pub world: CompactString,
    /// X coordinate (east is positive)
    pub x: i32,
    /// Y coordinate (up is positive)
    pub y: i32,
    /// Z coordinate (south is positive)
    pub z: i32,
}

impl BlockLocation {
    /// Creates a new location.
    ///
    /// # Arguments
    ///
    /// * `world` - World name
    /// * `x` - X coordinate
    /// * `y` - Y coordinate
    /// * `z` - Z coordinate
    pub fn new(world: impl Into<CompactString>, x: i32, y: i32, z: i32) -> Self {
        Self {
            world: world.into(),
            x,
            y,
            z,
        }
    }

    /// Returns the chunk this location is bucketed under.
    #[inline]
    pub fn chunk(&self) -> ChunkCoordinate {
        ChunkCoordinate::from_block(self.x, self.z)
    }

    /// Returns the location shifted by the given offsets, or `None` if any
    /// coordinate would leave the `i32` range.
    pub fn offset(&self, dx: i32, dy: i32, dz: i32) -> Option<Self> {
        Some(Self {
            world: self.world.clone(),
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
            z: self.z.checked_add(dz)?,
        })
    }

    /// Squared Euclidean distance to another location.
    ///
    /// Computed in `i64` and saturating, so coordinates at opposite ends of the
    /// `i32` range never overflow. The world name is ignored; callers only
    /// compare locations that share a world.
    pub fn distance_squared(&self, other: &BlockLocation) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        let dz = i64::from(self.z) - i64::from(other.z);
        dx.saturating_mul(dx)
            .saturating_add(dy.saturating_mul(dy))
            .saturating_add(dz.saturating_mul(dz))
    }

    /// Whether both locations name the same block (world and coordinates).
    #[inline]
    pub fn same_block(&self, other: &BlockLocation) -> bool {
        self == other
    }

    /// A location without a world name cannot be indexed or queried.
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.world.is_empty()
    }
}

impl fmt::Display for BlockLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@({}, {}, {})", self.world, self.x, self.y, self.z)
    }
}

/// A 16x16 horizontal grid cell used as the index bucket key.
///
/// Derived with an arithmetic shift, so negative block coordinates round
/// towards negative infinity (block -1 lives in chunk -1, not chunk 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChunkCoordinate {
    /// Chunk X coordinate
    pub x: i32,
    /// Chunk Z coordinate
    pub z: i32,
}

impl ChunkCoordinate {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk containing the block at (`block_x`, `block_z`).
    #[inline]
    pub const fn from_block(block_x: i32, block_z: i32) -> Self {
        Self {
            x: block_x >> CHUNK_SHIFT,
            z: block_z >> CHUNK_SHIFT,
        }
    }
}

impl fmt::Display for ChunkCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.z)
    }
}

// ============================================================================
// Categories
// ============================================================================

/// Role tag of an indexed block.
///
/// The category is a secondary key: it selects the bucket inside a chunk but
/// is not part of a block's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockCategory {
    /// Territory heart block
    Core,
    /// Claim marker extending a territory
    Claim,
    /// Turret, wall or other defensive structure
    Defense,
    /// Owner-restricted door
    Door,
    /// Marker placed outside of any territory
    Outside,
}

impl BlockCategory {
    /// Every category in scan order.
    ///
    /// When a query asks for "all categories" buckets are visited in this
    /// order, so a `Core` block shadows any other category at the same spot.
    pub const ALL: [BlockCategory; 5] = [
        BlockCategory::Core,
        BlockCategory::Claim,
        BlockCategory::Defense,
        BlockCategory::Door,
        BlockCategory::Outside,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            BlockCategory::Core => "CORE",
            BlockCategory::Claim => "CLAIM",
            BlockCategory::Defense => "DEFENSE",
            BlockCategory::Door => "DOOR",
            BlockCategory::Outside => "OUTSIDE",
        }
    }
}

impl fmt::Display for BlockCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves an optional category filter into the list of buckets to visit.
#[inline]
pub(crate) fn categories_for(filter: Option<BlockCategory>) -> &'static [BlockCategory] {
    match filter {
        Some(BlockCategory::Core) => &[BlockCategory::Core],
        Some(BlockCategory::Claim) => &[BlockCategory::Claim],
        Some(BlockCategory::Defense) => &[BlockCategory::Defense],
        Some(BlockCategory::Door) => &[BlockCategory::Door],
        Some(BlockCategory::Outside) => &[BlockCategory::Outside],
        None => &BlockCategory::ALL,
    }
}

// ============================================================================
// Directions
// ============================================================================

/// One of the ten fixed probe offsets.
///
/// North is -z, east is +x, up is +y. Vertical diagonals are intentionally
/// absent: adjacency in territory rules only looks sideways, straight up and
/// straight down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    North,
    South,
    East,
    West,
    Up,
    Down,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    /// The neighbour set probed by adjacency scans, in probe order.
    pub const ADJACENT: [Direction; 10] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::Up,
        Direction::Down,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    /// Integer step vector `(dx, dy, dz)`, each component in {-1, 0, 1}.
    pub const fn step(self) -> (i32, i32, i32) {
        match self {
            Direction::North => (0, 0, -1),
            Direction::South => (0, 0, 1),
            Direction::East => (1, 0, 0),
            Direction::West => (-1, 0, 0),
            Direction::Up => (0, 1, 0),
            Direction::Down => (0, -1, 0),
            Direction::NorthEast => (1, 0, -1),
            Direction::NorthWest => (-1, 0, -1),
            Direction::SouthEast => (1, 0, 1),
            Direction::SouthWest => (-1, 0, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_from_negative_coordinates_floors() {
        assert_eq!(ChunkCoordinate::from_block(0, 0), ChunkCoordinate::new(0, 0));
        assert_eq!(ChunkCoordinate::from_block(15, 15), ChunkCoordinate::new(0, 0));
        assert_eq!(ChunkCoordinate::from_block(16, -1), ChunkCoordinate::new(1, -1));
        assert_eq!(ChunkCoordinate::from_block(-16, -17), ChunkCoordinate::new(-1, -2));
    }

    #[test]
    fn test_distance_squared_does_not_overflow() {
        let a = BlockLocation::new("w", i32::MIN, i32::MIN, i32::MIN);
        let b = BlockLocation::new("w", i32::MAX, i32::MAX, i32::MAX);
        assert_eq!(a.distance_squared(&b), i64::MAX);
        assert_eq!(
            BlockLocation::new("w", 0, 64, 0).distance_squared(&BlockLocation::new("w", 3, 64, 0)),
            9
        );
    }

    #[test]
    fn test_offset_rejects_overflow() {
        let edge = BlockLocation::new("w", i32::MAX, 0, 0);
        assert!(edge.offset(1, 0, 0).is_none());
        assert_eq!(edge.offset(-1, 2, 3), Some(BlockLocation::new("w", i32::MAX - 1, 2, 3)));
    }

    #[test]
    fn test_adjacent_directions_are_unique_unit_steps() {
        let steps: std::collections::HashSet<_> =
            Direction::ADJACENT.iter().map(|d| d.step()).collect();
        assert_eq!(steps.len(), 10);
        for (dx, dy, dz) in steps {
            assert!(dx.abs() <= 1 && dy.abs() <= 1 && dz.abs() <= 1);
            // no vertical diagonals
            assert!(dy == 0 || (dx == 0 && dz == 0));
        }
    }

    #[test]
    fn test_owner_id_parse_and_display() {
        let owner: OwnerId = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
        assert_eq!(owner.to_string(), "550e8400-e29b-41d4-a716-446655440000");
        assert!("not-a-uuid".parse::<OwnerId>().is_err());
    }

    #[test]
    fn test_category_filter_resolution() {
        assert_eq!(categories_for(None), &BlockCategory::ALL);
        assert_eq!(categories_for(Some(BlockCategory::Door)), &[BlockCategory::Door]);
    }
}

//! The capability contract every indexed block satisfies, plus the stock
//! [`PlacedBlock`] implementation used by most callers.

use crate::types::{BlockCategory, BlockLocation, OwnerId};
use std::fmt::Debug;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Anything the territory index can track.
///
/// Implementors are owned by the code that placed them in the world; the index
/// only holds shared handles ([`BlockRef`]) and never mutates them. Fields that
/// change over a block's lifetime (level, health, ...) must therefore use
/// interior mutability so updates are visible through every handle without
/// re-indexing.
///
/// The location and category of an indexed block must not change while it is
/// indexed: remove it first, then add it again under the new key.
pub trait IndexedBlock: Send + Sync + Debug {
    /// Where the block sits.
    fn location(&self) -> &BlockLocation;

    /// Which bucket the block is filed under.
    fn category(&self) -> BlockCategory;

    /// Who owns the block.
    fn owner(&self) -> OwnerId;
}

/// Shared handle to an indexed block.
pub type BlockRef = Arc<dyn IndexedBlock>;

/// Whether two handles point at the same block object.
#[inline]
pub fn same_block(a: &BlockRef, b: &BlockRef) -> bool {
    Arc::ptr_eq(a, b)
}

/// A block placed by a player: core, claim, defense, door or outside marker.
///
/// # Examples
///
/// ```rust
/// use territory_index::{BlockLocation, IndexedBlock, OwnerId, PlacedBlock, BlockCategory};
///
/// let clan = OwnerId::new();
/// let core = PlacedBlock::core(BlockLocation::new("world", 0, 64, 0), clan);
/// core.set_level(3);
///
/// assert_eq!(core.category(), BlockCategory::Core);
/// assert_eq!(core.level(), 3);
/// ```
#[derive(Debug)]
pub struct PlacedBlock {
    location: BlockLocation,
    category: BlockCategory,
    owner: OwnerId,
    level: AtomicU32,
}

impl PlacedBlock {
    /// Creates a level-1 block.
    pub fn new(location: BlockLocation, category: BlockCategory, owner: OwnerId) -> Self {
        Self {
            location,
            category,
            owner,
            level: AtomicU32::new(1),
        }
    }

    pub fn core(location: BlockLocation, owner: OwnerId) -> Self {
        Self::new(location, BlockCategory::Core, owner)
    }

    pub fn claim(location: BlockLocation, owner: OwnerId) -> Self {
        Self::new(location, BlockCategory::Claim, owner)
    }

    pub fn defense(location: BlockLocation, owner: OwnerId) -> Self {
        Self::new(location, BlockCategory::Defense, owner)
    }

    pub fn door(location: BlockLocation, owner: OwnerId) -> Self {
        Self::new(location, BlockCategory::Door, owner)
    }

    pub fn outside(location: BlockLocation, owner: OwnerId) -> Self {
        Self::new(location, BlockCategory::Outside, owner)
    }

    /// Wraps the block in a shareable handle ready for indexing.
    pub fn into_ref(self) -> BlockRef {
        Arc::new(self)
    }

    /// Current upgrade level.
    pub fn level(&self) -> u32 {
        self.level.load(Ordering::Acquire)
    }

    /// Sets the upgrade level. Visible to every holder of the block.
    pub fn set_level(&self, level: u32) {
        self.level.store(level, Ordering::Release);
    }
}

impl IndexedBlock for PlacedBlock {
    fn location(&self) -> &BlockLocation {
        &self.location
    }

    fn category(&self) -> BlockCategory {
        self.category
    }

    fn owner(&self) -> OwnerId {
        self.owner
    }
}

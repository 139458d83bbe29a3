/// Cached read operations
use super::core::TerritoryIndex;
use crate::block::BlockRef;
use crate::cache::{AdjacentKey, ChunkKey, DirectionKey, ExactKey, NearestKey, OwnerKey, RadiusKey};
use crate::types::{BlockCategory, BlockLocation, ChunkCoordinate, Direction, OwnerId};

impl TerritoryIndex {
    /// Gets the block at exactly `location`.
    ///
    /// # Arguments
    ///
    /// * `location` - Block coordinate to look at
    /// * `category` - Bucket to search, or `None` for every category
    ///
    /// # Returns
    ///
    /// The block, or `None` if nothing is indexed there. With `category = None`
    /// and blocks of several categories on the same coordinate, the first in
    /// [`BlockCategory::ALL`] order is returned.
    pub fn get_block_at(&self, location: &BlockLocation, category: Option<BlockCategory>) -> Option<BlockRef> {
        if !location.is_valid() {
            return None;
        }

        let key = ExactKey {
            location: location.clone(),
            category,
        };
        self.read_through(&self.cache.exact, key, || self.engine().get_at(location, category))
    }

    /// Gets every block in chunk (`chunk_x`, `chunk_z`) of `world`.
    pub fn get_blocks_in_chunk(
        &self,
        world: &str,
        chunk_x: i32,
        chunk_z: i32,
        category: Option<BlockCategory>,
    ) -> Vec<BlockRef> {
        if world.is_empty() {
            return Vec::new();
        }

        let chunk = ChunkCoordinate::new(chunk_x, chunk_z);
        let key = ChunkKey {
            world: world.into(),
            chunk,
            category,
        };
        self.read_through(&self.cache.chunk, key, || {
            self.engine().get_in_chunk(world, chunk, category)
        })
    }

    /// Gets every block within `radius` blocks (Euclidean, inclusive) of `center`.
    ///
    /// A negative radius yields an empty list.
    pub fn get_blocks_in_radius(
        &self,
        center: &BlockLocation,
        radius: i32,
        category: Option<BlockCategory>,
    ) -> Vec<BlockRef> {
        if radius < 0 || !center.is_valid() {
            return Vec::new();
        }

        let key = RadiusKey {
            center: center.clone(),
            radius,
            category,
        };
        self.read_through(&self.cache.radius, key, || {
            self.engine().get_in_radius(center, radius, category)
        })
    }

    /// Probes the `distance` cells stepping from `origin` towards `direction`.
    ///
    /// A distance of zero or less yields an empty list.
    pub fn get_blocks_in_direction(
        &self,
        origin: &BlockLocation,
        direction: Direction,
        distance: i32,
        category: Option<BlockCategory>,
    ) -> Vec<BlockRef> {
        if distance <= 0 || !origin.is_valid() {
            return Vec::new();
        }

        let key = DirectionKey {
            origin: origin.clone(),
            direction,
            distance,
            category,
        };
        self.read_through(&self.cache.direction, key, || {
            self.engine().get_in_direction(origin, direction, distance, category)
        })
    }

    /// Gets the blocks on the ten neighbour cells of `location`.
    pub fn get_adjacent_blocks(&self, location: &BlockLocation, category: Option<BlockCategory>) -> Vec<BlockRef> {
        if !location.is_valid() {
            return Vec::new();
        }

        let key = AdjacentKey {
            location: location.clone(),
            category,
        };
        self.read_through(&self.cache.adjacent, key, || {
            self.engine().get_adjacent(location, category)
        })
    }

    /// Gets the closest block within `max_distance` of `location`.
    ///
    /// A `max_distance` of zero or less yields `None`.
    pub fn get_nearest_block(
        &self,
        location: &BlockLocation,
        category: Option<BlockCategory>,
        max_distance: i32,
    ) -> Option<BlockRef> {
        if max_distance <= 0 || !location.is_valid() {
            return None;
        }

        let key = NearestKey {
            location: location.clone(),
            category,
            max_distance,
        };
        self.read_through(&self.cache.nearest, key, || {
            self.engine().get_nearest(location, category, max_distance)
        })
    }

    /// Gets every block owned by `owner`, across all worlds, in insertion order.
    pub fn get_blocks_by_owner(&self, owner: OwnerId, category: Option<BlockCategory>) -> Vec<BlockRef> {
        let key = OwnerKey { owner, category };
        self.read_through(&self.cache.owner, key, || self.engine().get_by_owner(owner, category))
    }
}

/// Query algorithms over the index store
use super::store::{IndexStore, IndexedEntry};
use crate::block::BlockRef;
use crate::types::{
    BlockCategory, BlockLocation, ChunkCoordinate, Direction, OwnerId, CHUNK_SHIFT, CHUNK_SIZE,
};

/// Uncached implementation of every query shape.
///
/// All queries are read-only and take an optional category filter
/// (`None` = every category). Results that span several buckets (radius,
/// nearest and by-owner) come back in insertion order.
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'a> {
    store: &'a IndexStore,
}

impl<'a> QueryEngine<'a> {
    pub fn new(store: &'a IndexStore) -> Self {
        Self { store }
    }

    /// Block at exactly `location`.
    pub fn get_at(&self, location: &BlockLocation, category: Option<BlockCategory>) -> Option<BlockRef> {
        self.store.exact_lookup(location, category)
    }

    /// Blocks inside one chunk.
    pub fn get_in_chunk(
        &self,
        world: &str,
        chunk: ChunkCoordinate,
        category: Option<BlockCategory>,
    ) -> Vec<BlockRef> {
        self.store.bucket(world, chunk, category)
    }

    /// Blocks whose squared distance to `center` is at most `radius²`.
    ///
    /// Only chunks within `radius / 16 + 1` chunks of the center are inspected.
    /// A negative radius yields nothing.
    pub fn get_in_radius(
        &self,
        center: &BlockLocation,
        radius: i32,
        category: Option<BlockCategory>,
    ) -> Vec<BlockRef> {
        self.entries_in_radius(center, radius, category)
            .into_iter()
            .map(|entry| entry.block)
            .collect()
    }

    /// Blocks on the stepped line `origin + i * step` for `i = 1..=distance`.
    ///
    /// This is a sparse single-cell probe: a block one cell off the line is not
    /// found even if it is roughly "in that direction". Hits come back nearest
    /// first; with no category filter a cell reports its first block in
    /// [`BlockCategory::ALL`] order, like [`get_at`](Self::get_at).
    ///
    /// Only the chunks the line crosses are inspected (one chunk for `Up` and
    /// `Down`), so the cost does not grow with `distance` cell by cell.
    pub fn get_in_direction(
        &self,
        origin: &BlockLocation,
        direction: Direction,
        distance: i32,
        category: Option<BlockCategory>,
    ) -> Vec<BlockRef> {
        if distance <= 0 || !origin.is_valid() {
            return Vec::new();
        }

        let ray = Ray::new(origin, direction, distance);
        if ray.reach == 0 {
            return Vec::new();
        }

        let first = ray.chunk_at(1);
        let last = ray.chunk_at(ray.reach);
        let crossed = i64::from(first.x.abs_diff(last.x)) + i64::from(first.z.abs_diff(last.z)) + 1;
        let mut candidates: Vec<IndexedEntry> = Vec::new();

        if crossed > self.store.bucket_count() as i64 {
            let (min_x, max_x) = (first.x.min(last.x), first.x.max(last.x));
            let (min_z, max_z) = (first.z.min(last.z), first.z.max(last.z));
            self.store.for_each_bucket(|key, entries| {
                let in_range = key.world == origin.world
                    && (min_x..=max_x).contains(&key.chunk.x)
                    && (min_z..=max_z).contains(&key.chunk.z)
                    && category.map_or(true, |wanted| wanted == key.category);
                if in_range {
                    candidates.extend(entries.iter().cloned());
                }
            });
        } else {
            let mut k = 1;
            while k <= ray.reach {
                self.store
                    .collect_chunk(&origin.world, ray.chunk_at(k), category, &mut candidates);
                k = ray.next_chunk_step(k);
            }
        }

        let mut hits: Vec<(i64, BlockCategory, BlockRef)> = candidates
            .into_iter()
            .filter_map(|entry| {
                let k = ray.step_of(entry.block.location())?;
                Some((k, entry.block.category(), entry.block))
            })
            .collect();
        hits.sort_unstable_by_key(|(k, category, _)| (*k, *category));
        // one block per cell, the earliest category wins
        hits.dedup_by_key(|(k, _, _)| *k);
        hits.into_iter().map(|(_, _, block)| block).collect()
    }

    /// Blocks on the ten fixed neighbour cells, in [`Direction::ADJACENT`] order.
    pub fn get_adjacent(&self, location: &BlockLocation, category: Option<BlockCategory>) -> Vec<BlockRef> {
        if !location.is_valid() {
            return Vec::new();
        }

        Direction::ADJACENT
            .iter()
            .filter_map(|direction| {
                let (dx, dy, dz) = direction.step();
                location.offset(dx, dy, dz)
            })
            .filter_map(|probe| self.store.exact_lookup(&probe, category))
            .collect()
    }

    /// Closest block within `max_distance`.
    ///
    /// Ties on distance go to the block that was indexed first.
    pub fn get_nearest(
        &self,
        location: &BlockLocation,
        category: Option<BlockCategory>,
        max_distance: i32,
    ) -> Option<BlockRef> {
        if max_distance <= 0 {
            return None;
        }

        self.entries_in_radius(location, max_distance, category)
            .into_iter()
            .min_by_key(|entry| (entry.block.location().distance_squared(location), entry.seq))
            .map(|entry| entry.block)
    }

    /// Every block owned by `owner`, across all worlds.
    ///
    /// Linear in the size of the index; meant for occasional use, not per tick.
    pub fn get_by_owner(&self, owner: OwnerId, category: Option<BlockCategory>) -> Vec<BlockRef> {
        let mut hits: Vec<IndexedEntry> = Vec::new();
        self.store.for_each_bucket(|key, entries| {
            if category.is_some_and(|wanted| wanted != key.category) {
                return;
            }
            hits.extend(
                entries
                    .iter()
                    .filter(|entry| entry.block.owner() == owner)
                    .cloned(),
            );
        });

        hits.sort_unstable_by_key(|entry| entry.seq);
        hits.into_iter().map(|entry| entry.block).collect()
    }

    /// Radius scan keeping sequence numbers, sorted by insertion order.
    fn entries_in_radius(
        &self,
        center: &BlockLocation,
        radius: i32,
        category: Option<BlockCategory>,
    ) -> Vec<IndexedEntry> {
        if radius < 0 || !center.is_valid() {
            return Vec::new();
        }

        let radius_sq = i64::from(radius) * i64::from(radius);
        let chunk_radius = radius / CHUNK_SIZE + 1;
        let center_chunk = center.chunk();
        let min_x = center_chunk.x - chunk_radius;
        let max_x = center_chunk.x + chunk_radius;
        let min_z = center_chunk.z - chunk_radius;
        let max_z = center_chunk.z + chunk_radius;

        let span = 2 * i64::from(chunk_radius) + 1;
        let mut candidates: Vec<IndexedEntry> = Vec::new();

        if span * span > self.store.bucket_count() as i64 {
            // The chunk square is bigger than the index itself: walk the
            // buckets instead of the (mostly empty) chunk grid.
            self.store.for_each_bucket(|key, entries| {
                let in_range = key.world == center.world
                    && (min_x..=max_x).contains(&key.chunk.x)
                    && (min_z..=max_z).contains(&key.chunk.z)
                    && category.map_or(true, |wanted| wanted == key.category);
                if in_range {
                    candidates.extend(entries.iter().cloned());
                }
            });
        } else {
            for chunk_x in min_x..=max_x {
                for chunk_z in min_z..=max_z {
                    self.store.collect_chunk(
                        &center.world,
                        ChunkCoordinate::new(chunk_x, chunk_z),
                        category,
                        &mut candidates,
                    );
                }
            }
        }

        candidates.retain(|entry| entry.block.location().distance_squared(center) <= radius_sq);
        candidates.sort_unstable_by_key(|entry| entry.seq);
        candidates
    }
}

/// The cells `origin + k * step` for `k = 1..=reach`, in `i64` so no step
/// can overflow.
#[derive(Debug, Clone, Copy)]
struct Ray {
    origin: [i64; 3],
    step: [i64; 3],
    /// Last step whose cell still fits the `i32` coordinate range
    reach: i64,
}

impl Ray {
    fn new(origin: &BlockLocation, direction: Direction, distance: i32) -> Self {
        let (dx, dy, dz) = direction.step();
        let origin = [i64::from(origin.x), i64::from(origin.y), i64::from(origin.z)];
        let step = [i64::from(dx), i64::from(dy), i64::from(dz)];

        let mut reach = i64::from(distance);
        for (coord, delta) in origin.iter().zip(step) {
            let room = match delta.signum() {
                1 => i64::from(i32::MAX) - coord,
                -1 => coord - i64::from(i32::MIN),
                _ => continue,
            };
            reach = reach.min(room);
        }

        Self { origin, step, reach }
    }

    fn cell(&self, k: i64, axis: usize) -> i64 {
        self.origin[axis] + k * self.step[axis]
    }

    fn chunk_at(&self, k: i64) -> ChunkCoordinate {
        // k <= reach keeps both cells inside i32
        ChunkCoordinate::from_block(self.cell(k, 0) as i32, self.cell(k, 2) as i32)
    }

    /// First step after `k` that lands in another chunk, or past `reach`.
    fn next_chunk_step(&self, k: i64) -> i64 {
        let mut next = self.reach + 1;
        for axis in [0, 2] {
            let cell = self.cell(k, axis);
            let chunk_start = (cell >> CHUNK_SHIFT) << CHUNK_SHIFT;
            let left = match self.step[axis].signum() {
                1 => chunk_start + i64::from(CHUNK_SIZE) - cell,
                -1 => cell - chunk_start + 1,
                _ => continue,
            };
            next = next.min(k + left);
        }
        next
    }

    /// The `k` for which `location` is the k-th cell of the ray, if any.
    fn step_of(&self, location: &BlockLocation) -> Option<i64> {
        let offset = [
            i64::from(location.x) - self.origin[0],
            i64::from(location.y) - self.origin[1],
            i64::from(location.z) - self.origin[2],
        ];
        let axis = self.step.iter().position(|&delta| delta != 0)?;
        let k = offset[axis] * self.step[axis];
        let on_line = (0..3).all(|i| offset[i] == k * self.step[i]);
        (on_line && (1..=self.reach).contains(&k)).then_some(k)
    }
}

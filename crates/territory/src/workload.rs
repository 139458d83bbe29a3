//! Deterministic synthetic workload for the territory index.
//!
//! Lays out one square territory per owner in every configured world and
//! replays a fixed query mix against it each tick, with a little churn so
//! cache invalidation is exercised too.

use crate::config::WorkloadSettings;
use std::sync::Arc;
use territory_index::{
    BlockCategory, BlockLocation, BlockRef, Direction, IndexedBlock, OwnerId, PlacedBlock,
    TerritoryIndex,
};
use tracing::debug;

/// Height every synthetic block is placed at.
const GROUND_Y: i32 = 64;
/// Ticks between churn mutations.
const CHURN_EVERY: u64 = 10;
/// Ticks between core level upgrades.
const UPGRADE_EVERY: u64 = 50;

/// Seeded territories plus the handles the tick loop works with.
#[derive(Debug)]
pub struct Workload {
    owners: Vec<OwnerId>,
    cores: Vec<Arc<PlacedBlock>>,
    churn: Vec<BlockRef>,
    probe_radius: i32,
}

/// What a single tick saw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Queries issued
    pub queries: usize,
    /// Blocks returned across all queries
    pub blocks_seen: usize,
    /// Whether the tick removed and re-added a block
    pub churned: bool,
}

impl Workload {
    /// Builds every territory and loads it into `index` in one rebuild.
    pub fn seed(index: &TerritoryIndex, settings: &WorkloadSettings) -> Self {
        let grid = settings.grid_size as i32;
        let spacing = settings.spacing as i32;
        let width = grid * spacing;
        let owners: Vec<OwnerId> = (0..settings.owners).map(|_| OwnerId::new()).collect();

        let mut blocks: Vec<BlockRef> = Vec::new();
        let mut cores = Vec::new();
        let mut churn = Vec::new();

        for world in &settings.worlds {
            for (slot, &owner) in owners.iter().enumerate() {
                // leave one territory width of wilderness between neighbours
                let base_x = slot as i32 * width * 2;

                for gx in 0..grid {
                    for gz in 0..grid {
                        let location =
                            BlockLocation::new(world.as_str(), base_x + gx * spacing, GROUND_Y, gz * spacing);
                        let edge = gx == 0 || gz == 0 || gx == grid - 1 || gz == grid - 1;

                        let block = if gx == 0 && gz == 0 {
                            let core = Arc::new(PlacedBlock::core(location, owner));
                            cores.push(Arc::clone(&core));
                            blocks.push(core);
                            continue;
                        } else if edge && (gx + gz) % 4 == 0 {
                            PlacedBlock::door(location, owner).into_ref()
                        } else if edge {
                            PlacedBlock::defense(location, owner).into_ref()
                        } else {
                            PlacedBlock::claim(location, owner).into_ref()
                        };

                        if block.category() == BlockCategory::Claim && churn.len() < settings.owners {
                            churn.push(Arc::clone(&block));
                        }
                        blocks.push(block);
                    }
                }

                let marker = BlockLocation::new(world.as_str(), base_x - spacing, GROUND_Y, -spacing);
                blocks.push(PlacedBlock::outside(marker, owner).into_ref());
            }
        }

        let indexed = index.rebuild_index(blocks);
        debug!("🌱 Seeded {} blocks for {} owners", indexed, owners.len());

        Self {
            owners,
            cores,
            churn,
            probe_radius: width.max(1),
        }
    }

    pub fn owners(&self) -> &[OwnerId] {
        &self.owners
    }

    /// Runs one tick of queries (and occasional mutations) against `index`.
    pub fn run_tick(&self, index: &TerritoryIndex, tick: u64) -> TickReport {
        let mut report = TickReport::default();
        if self.cores.is_empty() {
            return report;
        }

        let core = &self.cores[(tick % self.cores.len() as u64) as usize];
        let anchor = core.location().clone();
        let chunk = anchor.chunk();
        let direction = Direction::ADJACENT[(tick % Direction::ADJACENT.len() as u64) as usize];
        let owner = self.owners[(tick % self.owners.len() as u64) as usize];

        let mut record = |found: usize| {
            report.queries += 1;
            report.blocks_seen += found;
        };

        record(usize::from(index.get_block_at(&anchor, Some(BlockCategory::Core)).is_some()));
        record(index.get_blocks_in_chunk(anchor.world.as_str(), chunk.x, chunk.z, None).len());
        record(index.get_blocks_in_radius(&anchor, self.probe_radius, Some(BlockCategory::Defense)).len());
        record(index.get_blocks_in_direction(&anchor, direction, self.probe_radius, None).len());
        record(index.get_adjacent_blocks(&anchor, None).len());
        record(usize::from(index.get_nearest_block(&anchor, Some(BlockCategory::Door), self.probe_radius).is_some()));
        if tick % CHURN_EVERY == 0 {
            record(index.get_blocks_by_owner(owner, None).len());
        }

        if tick > 0 && tick % CHURN_EVERY == 0 && !self.churn.is_empty() {
            let block = &self.churn[((tick / CHURN_EVERY) % self.churn.len() as u64) as usize];
            if index.remove_block(block.location(), block.category()) {
                index.add_block(Arc::clone(block));
                report.churned = true;
            }
        }

        if tick > 0 && tick % UPGRADE_EVERY == 0 {
            // level lives on the block itself, no re-index needed
            core.set_level(core.level() + 1);
        }

        report
    }
}

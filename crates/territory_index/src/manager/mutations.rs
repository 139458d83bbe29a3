/// Write operations; each one invalidates the whole query cache
use super::core::TerritoryIndex;
use crate::block::BlockRef;
use crate::types::{BlockCategory, BlockLocation};
use tracing::{debug, info};

impl TerritoryIndex {
    /// Registers a newly placed block.
    ///
    /// Returns `false` (and changes nothing) when a block of the same category
    /// already sits on that coordinate, or when the block has no world.
    pub fn add_block(&self, block: BlockRef) -> bool {
        let location = block.location().clone();
        let category = block.category();

        let added = self.store.add(block);
        self.cache.clear_all();

        if added {
            debug!("🧱 Indexed {} block at {}", category, location);
        } else {
            debug!("🔁 Ignored duplicate {} block at {}", category, location);
        }
        added
    }

    /// Removes the block filed under `category` at `location`.
    ///
    /// Returns whether a block was removed. A block filed under another
    /// category at the same coordinate is left untouched.
    pub fn remove_block(&self, location: &BlockLocation, category: BlockCategory) -> bool {
        let removed = self.store.remove(location, category);
        self.cache.clear_all();

        if removed {
            debug!("🗑️ Removed {} block at {}", category, location);
        }
        removed
    }

    /// Replaces the whole index with `blocks`, e.g. after a reload.
    ///
    /// Returns the number of blocks indexed (duplicates collapse).
    pub fn rebuild_index(&self, blocks: impl IntoIterator<Item = BlockRef>) -> usize {
        let indexed = self.store.rebuild(blocks);
        self.cache.clear_all();

        info!("🔄 Rebuilt territory index with {} blocks", indexed);
        indexed
    }

    /// Discards every indexed block and every cached result.
    pub fn clear_index(&self) {
        self.store.clear();
        self.cache.clear_all();

        info!("🧹 Cleared territory index");
    }
}

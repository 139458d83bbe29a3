use super::{at, block, describe};
use crate::block::same_block;
use crate::manager::TerritoryIndex;
use crate::types::{BlockCategory, BlockLocation, Direction, OwnerId};
use std::collections::HashSet;

#[test]
fn test_core_is_only_visible_under_its_own_category() {
    let index = TerritoryIndex::new();
    let clan_a = OwnerId::new();
    let core = block(BlockCategory::Core, at(0, 64, 0), clan_a);
    assert!(index.add_block(core.clone()));

    let found = index.get_block_at(&at(0, 64, 0), Some(BlockCategory::Core)).unwrap();
    assert!(same_block(&found, &core));
    assert!(index.get_block_at(&at(0, 64, 0), Some(BlockCategory::Claim)).is_none());
}

#[test]
fn test_chunk_query_returns_only_that_chunk() {
    let index = TerritoryIndex::new();
    let owner = OwnerId::new();
    index.add_block(block(BlockCategory::Core, at(1, 64, 1), owner));
    index.add_block(block(BlockCategory::Claim, at(2, 64, 2), owner));
    index.add_block(block(BlockCategory::Defense, at(20, 64, 20), owner));

    assert_eq!(index.get_blocks_in_chunk("w", 0, 0, None).len(), 2);
    assert_eq!(index.get_blocks_in_chunk("w", 1, 1, None).len(), 1);
    assert_eq!(index.get_blocks_in_chunk("w", 0, 0, Some(BlockCategory::Claim)).len(), 1);
    assert!(index.get_blocks_in_chunk("other", 0, 0, None).is_empty());
}

#[test]
fn test_radius_filters_by_true_distance() {
    let index = TerritoryIndex::new();
    let owner = OwnerId::new();
    index.add_block(block(BlockCategory::Claim, at(3, 64, 0), owner));
    index.add_block(block(BlockCategory::Claim, at(6, 64, 8), owner));

    let hits = index.get_blocks_in_radius(&at(0, 64, 0), 5, None);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].location().x, 3);

    assert_eq!(index.get_blocks_in_radius(&at(0, 64, 0), 10, None).len(), 2);
}

#[test]
fn test_remove_under_wrong_category_is_a_no_op() {
    let index = TerritoryIndex::new();
    let loc = at(5, 70, 5);
    index.add_block(block(BlockCategory::Core, loc.clone(), OwnerId::new()));

    assert!(!index.remove_block(&loc, BlockCategory::Defense));
    assert!(index.get_block_at(&loc, Some(BlockCategory::Core)).is_some());
    assert_eq!(index.len(), 1);
}

#[test]
fn test_clear_index_forgets_everything() {
    let index = TerritoryIndex::new();
    let owner = OwnerId::new();
    let loc = at(0, 64, 0);
    index.add_block(block(BlockCategory::Core, loc.clone(), owner));
    index.add_block(block(BlockCategory::Door, at(1, 64, 0), owner));

    // warm the cache so stale entries would show
    assert!(index.get_block_at(&loc, None).is_some());
    assert_eq!(index.get_blocks_by_owner(owner, None).len(), 2);

    index.clear_index();

    assert!(index.get_block_at(&loc, None).is_none());
    assert!(index.get_blocks_in_chunk("w", 0, 0, None).is_empty());
    assert!(index.get_blocks_in_radius(&loc, 32, None).is_empty());
    assert!(index.get_blocks_in_direction(&loc, Direction::East, 4, None).is_empty());
    assert!(index.get_adjacent_blocks(&loc, None).is_empty());
    assert!(index.get_nearest_block(&loc, None, 32).is_none());
    assert!(index.get_blocks_by_owner(owner, None).is_empty());

    let stats = index.get_statistics();
    assert!(stats.is_empty());
    assert!(BlockCategory::ALL.iter().all(|&c| stats.count(c) == 0));
}

#[test]
fn test_exact_round_trip() {
    let index = TerritoryIndex::new();
    let owner = OwnerId::new();
    let placed: Vec<_> = (0..40)
        .map(|i| {
            let category = BlockCategory::ALL[i % 5];
            let i = i as i32;
            block(category, at(i * 7 - 100, 60 + i % 3, 50 - i * 11), owner)
        })
        .collect();

    for b in &placed {
        assert!(index.add_block(b.clone()));
        let found = index.get_block_at(b.location(), Some(b.category())).unwrap();
        assert!(same_block(&found, b));
    }
    for b in &placed {
        assert!(index.remove_block(b.location(), b.category()));
        assert!(index.get_block_at(b.location(), Some(b.category())).is_none());
    }
    assert!(index.is_empty());
}

#[test]
fn test_category_isolation_on_shared_coordinates() {
    let index = TerritoryIndex::new();
    let loc = at(-3, 64, -3);
    index.add_block(block(BlockCategory::Door, loc.clone(), OwnerId::new()));

    for category in BlockCategory::ALL {
        let found = index.get_block_at(&loc, Some(category));
        assert_eq!(found.is_some(), category == BlockCategory::Door);
        let nearby = index.get_blocks_in_radius(&loc, 2, Some(category));
        assert_eq!(nearby.len(), usize::from(category == BlockCategory::Door));
    }

    // another category may share the coordinate
    assert!(index.add_block(block(BlockCategory::Outside, loc.clone(), OwnerId::new())));
    assert_eq!(index.get_blocks_in_radius(&loc, 0, None).len(), 2);
    assert_eq!(index.get_block_at(&loc, None).unwrap().category(), BlockCategory::Door);
}

#[test]
fn test_chunk_scoping_with_negative_coordinates() {
    let index = TerritoryIndex::new();
    index.add_block(block(BlockCategory::Claim, at(-1, 64, -1), OwnerId::new()));

    assert_eq!(index.get_blocks_in_chunk("w", -1, -1, None).len(), 1);
    for (cx, cz) in [(0, 0), (-1, 0), (0, -1), (-2, -1)] {
        assert!(index.get_blocks_in_chunk("w", cx, cz, None).is_empty());
    }
}

#[test]
fn test_radius_results_grow_with_radius() {
    let index = TerritoryIndex::new();
    let owner = OwnerId::new();
    for i in 0..60 {
        let x = (i * 37) % 97 - 48;
        let z = (i * 53) % 89 - 44;
        index.add_block(block(BlockCategory::ALL[(i % 5) as usize], at(x, 64 + i % 4, z), owner));
    }

    let center = at(3, 65, -2);
    let mut previous: HashSet<BlockLocation> = HashSet::new();
    for radius in [0, 1, 5, 15, 16, 17, 33, 60, 200] {
        let current: HashSet<BlockLocation> = index
            .get_blocks_in_radius(&center, radius, None)
            .iter()
            .map(|b| b.location().clone())
            .collect();
        assert!(previous.is_subset(&current), "radius {} lost results", radius);
        previous = current;
    }
    assert_eq!(previous.len(), 60);
}

#[test]
fn test_adjacency_probes_ten_offsets() {
    let index = TerritoryIndex::new();
    let owner = OwnerId::new();
    let center = at(16, 64, 16);

    for direction in Direction::ADJACENT {
        let (dx, dy, dz) = direction.step();
        let loc = center.offset(dx, dy, dz).unwrap();
        index.add_block(block(BlockCategory::Defense, loc, owner));
    }
    // off the fixed offsets: vertical diagonal and two steps away
    index.add_block(block(BlockCategory::Defense, at(17, 65, 16), owner));
    index.add_block(block(BlockCategory::Defense, at(18, 64, 16), owner));

    assert_eq!(index.get_adjacent_blocks(&center, None).len(), 10);
    assert_eq!(index.get_adjacent_blocks(&center, Some(BlockCategory::Defense)).len(), 10);
    assert!(index.get_adjacent_blocks(&center, Some(BlockCategory::Core)).is_empty());
}

#[test]
fn test_direction_is_a_sparse_line_probe() {
    let index = TerritoryIndex::new();
    let owner = OwnerId::new();
    let origin = at(0, 64, 0);
    index.add_block(block(BlockCategory::Claim, at(0, 64, -2), owner));
    index.add_block(block(BlockCategory::Claim, at(0, 64, -5), owner));
    index.add_block(block(BlockCategory::Claim, at(1, 64, -3), owner));

    let north = index.get_blocks_in_direction(&origin, Direction::North, 5, None);
    assert_eq!(describe(&north).iter().map(|(l, _, _)| l.z).collect::<Vec<_>>(), vec![-2, -5]);
    assert_eq!(index.get_blocks_in_direction(&origin, Direction::North, 4, None).len(), 1);
    assert!(index.get_blocks_in_direction(&origin, Direction::South, 5, None).is_empty());
}

#[test]
fn test_direction_with_unbounded_distance() {
    let index = TerritoryIndex::new();
    let owner = OwnerId::new();
    index.add_block(block(BlockCategory::Core, at(0, 10, 0), owner));
    index.add_block(block(BlockCategory::Claim, at(0, 10, 0), owner));

    let started = std::time::Instant::now();
    let up = index.get_blocks_in_direction(&at(0, 0, 0), Direction::Up, i32::MAX, None);
    let down = index.get_blocks_in_direction(&at(0, 0, 0), Direction::Down, i32::MAX, None);
    let west = index.get_blocks_in_direction(&at(9_000, 10, 0), Direction::West, i32::MAX, None);
    assert!(started.elapsed() < std::time::Duration::from_secs(1));

    assert_eq!(up.len(), 1);
    assert_eq!(up[0].category(), BlockCategory::Core);
    assert!(down.is_empty());
    assert_eq!(describe(&west), describe(&up));
}

#[test]
fn test_nearest_and_owner_queries() {
    let index = TerritoryIndex::new();
    let clan_a = OwnerId::new();
    let clan_b = OwnerId::new();
    index.add_block(block(BlockCategory::Core, at(10, 64, 0), clan_a));
    index.add_block(block(BlockCategory::Core, at(-10, 64, 0), clan_b));
    index.add_block(block(BlockCategory::Claim, at(2, 64, 0), clan_a));
    index.add_block(block(BlockCategory::Core, BlockLocation::new("nether", 0, 64, 0), clan_a));

    let nearest = index.get_nearest_block(&at(0, 64, 0), Some(BlockCategory::Core), 20).unwrap();
    assert_eq!(nearest.owner(), clan_a);
    assert_eq!(nearest.location().x, 10);
    assert_eq!(
        index.get_nearest_block(&at(0, 64, 0), None, 20).unwrap().location().x,
        2
    );
    assert!(index.get_nearest_block(&at(0, 64, 0), Some(BlockCategory::Core), 9).is_none());

    assert_eq!(index.get_blocks_by_owner(clan_a, None).len(), 3);
    assert_eq!(index.get_blocks_by_owner(clan_a, Some(BlockCategory::Core)).len(), 2);
    assert_eq!(index.get_blocks_by_owner(clan_b, None).len(), 1);
}

#[test]
fn test_invalid_inputs_yield_nothing() {
    let index = TerritoryIndex::new();
    let owner = OwnerId::new();
    let loc = at(0, 64, 0);
    index.add_block(block(BlockCategory::Core, loc.clone(), owner));
    let nowhere = BlockLocation::new("", 0, 64, 0);

    assert!(!index.add_block(block(BlockCategory::Core, nowhere.clone(), owner)));
    assert!(index.get_block_at(&nowhere, None).is_none());
    assert!(index.get_blocks_in_chunk("", 0, 0, None).is_empty());
    assert!(index.get_blocks_in_radius(&loc, -1, None).is_empty());
    assert!(index.get_blocks_in_direction(&loc, Direction::Up, 0, None).is_empty());
    assert!(index.get_blocks_in_direction(&loc, Direction::Up, -3, None).is_empty());
    assert!(index.get_nearest_block(&loc, None, 0).is_none());
    assert!(index.get_adjacent_blocks(&nowhere, None).is_empty());
    assert!(!index.remove_block(&nowhere, BlockCategory::Core));

    // radius zero still matches the center cell
    assert_eq!(index.get_blocks_in_radius(&loc, 0, None).len(), 1);
}

#[test]
fn test_rebuild_replaces_contents_and_invalidates_reads() {
    let index = TerritoryIndex::new();
    let owner = OwnerId::new();
    index.add_block(block(BlockCategory::Core, at(0, 64, 0), owner));
    assert_eq!(index.get_blocks_by_owner(owner, None).len(), 1);

    let indexed = index.rebuild_index(vec![
        block(BlockCategory::Claim, at(1, 64, 1), owner),
        block(BlockCategory::Claim, at(1, 64, 1), owner),
        block(BlockCategory::Door, at(2, 64, 2), owner),
    ]);

    assert_eq!(indexed, 2);
    assert!(index.get_block_at(&at(0, 64, 0), None).is_none());
    let owned = index.get_blocks_by_owner(owner, None);
    assert_eq!(
        owned.iter().map(|b| b.category()).collect::<Vec<_>>(),
        vec![BlockCategory::Claim, BlockCategory::Door]
    );
}

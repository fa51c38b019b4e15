mod common;

use civgen::{
    CivilizationExport, Grid, NO_NATION, NullReporter, RoadLevel, generate_civilization,
    generate_world,
};
use civgen::settlement::aggregate_clusters;
use civgen::SettlementTier;
use common::small_world;

fn run(seed: u64) -> (Grid, civgen::Civilization) {
    let params = small_world(seed);
    let mut grid = generate_world(&params).unwrap();
    let civ = generate_civilization(&mut grid, &params.civilization, &NullReporter).unwrap();
    (grid, civ)
}

#[test]
fn parent_chains_are_acyclic_and_climb_tiers() {
    let (grid, _) = run(3);
    for idx in grid.settlements() {
        let mut current = idx;
        let mut hops = 0;
        while let Some(parent) = grid[current].parent_hex_id {
            assert!(
                grid[parent].settlement_tier > grid[current].settlement_tier,
                "{} → {}",
                grid[current].coord,
                grid[parent].coord
            );
            assert_eq!(grid[parent].nation_id, grid[current].nation_id);
            current = parent;
            hops += 1;
            assert!(hops <= grid.len(), "цикл у {}", grid[idx].coord);
        }
    }
}

#[test]
fn territory_ids_point_at_roots_and_skip_water() {
    let (grid, _) = run(5);
    for node in grid.nodes() {
        if node.is_water {
            assert_eq!(node.territory_id, None);
            assert_eq!(node.nation_id, NO_NATION);
            continue;
        }
        if let Some(root) = node.territory_id {
            let root = &grid[root];
            assert!(root.parent_hex_id.is_none() || root.nation_id == NO_NATION);
        }
    }
}

#[test]
fn capitals_have_distinct_nations() {
    let (grid, civ) = run(8);
    assert!(!civ.capitals.is_empty());
    for (rank, &capital) in civ.capitals.iter().enumerate() {
        assert_eq!(grid[capital].settlement_tier, SettlementTier::Capital);
        assert_eq!(grid[capital].nation_id, rank as u32 + 1);
        assert_eq!(grid[capital].territory_id, Some(capital));
    }
}

#[test]
fn roads_are_contiguous_land_paths() {
    let (grid, civ) = run(13);
    assert!(!civ.roads.is_empty());
    for road in &civ.roads {
        assert!(road.path.len() >= 2);
        for pair in road.path.windows(2) {
            assert_eq!(pair[0].distance(pair[1]), 1);
        }
        if road.level != RoadLevel::SeaRoute {
            for &coord in &road.path {
                let node = &grid[grid.index_of(coord).unwrap()];
                assert!(!node.is_water);
            }
        }
    }
}

#[test]
fn trunk_edge_count_matches_components() {
    let (_, civ) = run(21);
    let trunk = civ.roads.iter().filter(|r| r.level == RoadLevel::Trunk).count();
    let sea = civ.roads.iter().filter(|r| r.level == RoadLevel::SeaRoute).count();
    assert_eq!(sea, civ.sea_routes);
    assert_eq!(trunk + sea, civ.trunk_hubs - civ.trunk_components);
}

#[test]
fn clusters_never_exceed_cap() {
    let params = small_world(34);
    let grid = generate_world(&params).unwrap();
    let villages: Vec<usize> = grid
        .settlements()
        .filter(|&idx| grid[idx].settlement_tier == SettlementTier::Village)
        .collect();
    for cap in [1, 3, 7] {
        let clusters = aggregate_clusters(&grid, &villages, cap, 2);
        assert!(clusters.iter().all(|c| c.members.len() <= cap));
        let total: usize = clusters.iter().map(|c| c.members.len()).sum();
        assert_eq!(total, villages.len());
    }
}

#[test]
fn same_seed_gives_identical_output() {
    let (grid_a, civ_a) = run(55);
    let (grid_b, civ_b) = run(55);
    let a = CivilizationExport::new(&grid_a, &civ_a).to_json_string().unwrap();
    let b = CivilizationExport::new(&grid_b, &civ_b).to_json_string().unwrap();
    assert_eq!(a, b);
}

mod common;

use civgen::config::{CivilizationSettings, CostSettings, NetworkSettings, TerritorySettings};
use civgen::network::build_trunk_network;
use civgen::settlement::aggregate_clusters;
use civgen::territory::propagate_territory;
use civgen::{NO_NATION, NullReporter, SettlementTier, generate_civilization};
use common::{flat, idx, with_water};

// ---------------------------------------------------------------------------
// Магистрали: Краскал по попарным A*
// ---------------------------------------------------------------------------

#[test]
fn trunk_picks_cheapest_spanning_edges() {
    let grid = flat(20, 20);
    let a = idx(&grid, 2, 2);
    let b = idx(&grid, 6, 2);
    let c = idx(&grid, 2, 9);
    let d = idx(&grid, 14, 12);

    let network = build_trunk_network(
        &grid,
        &[a, b, c, d],
        &CostSettings::default(),
        &NetworkSettings::default(),
        &NullReporter,
    );

    // Пары по стоимости: AB 4, AC 7, BC 9, CD 12, BD 14, AD 16
    let mut edges: Vec<(usize, usize, f64)> = network
        .segments
        .iter()
        .map(|s| (s.from.min(s.to), s.from.max(s.to), s.cost))
        .collect();
    edges.sort_by(|x, y| x.2.total_cmp(&y.2));
    assert_eq!(
        edges,
        vec![
            (a.min(b), a.max(b), 4.0),
            (a.min(c), a.max(c), 7.0),
            (c.min(d), c.max(d), 12.0)
        ]
    );
    assert_eq!(network.components(), 1);
}

#[test]
fn single_hub_builds_nothing() {
    let grid = flat(10, 10);
    let network = build_trunk_network(
        &grid,
        &[idx(&grid, 5, 5)],
        &CostSettings::default(),
        &NetworkSettings::default(),
        &NullReporter,
    );
    assert!(network.segments.is_empty());
    assert_eq!(network.components(), 1);
}

#[test]
fn disconnected_hubs_give_h_minus_k_edges() {
    // Две суши, разделённые проливом в столбцах 8..=11
    let grid = with_water(20, 10, |c| (8..=11).contains(&c.col));
    let hubs = [
        idx(&grid, 1, 1),
        idx(&grid, 5, 3),
        idx(&grid, 2, 8),
        idx(&grid, 14, 2),
        idx(&grid, 18, 7),
    ];
    let network = build_trunk_network(
        &grid,
        &hubs,
        &CostSettings::default(),
        &NetworkSettings::default(),
        &NullReporter,
    );
    assert_eq!(network.components(), 2);
    assert_eq!(network.segments.len(), hubs.len() - 2);
}

// ---------------------------------------------------------------------------
// Кластеры деревень
// ---------------------------------------------------------------------------

#[test]
fn nine_adjacent_villages_split_seven_and_two() {
    let mut grid = flat(9, 1);
    let villages: Vec<usize> = (0..9)
        .map(|col| {
            grid.place_settlement(civgen::HexCoord::new(col, 0), SettlementTier::Village, 100 - col)
                .unwrap()
        })
        .collect();

    let clusters = aggregate_clusters(&grid, &villages, 7, 1);
    let sizes: Vec<usize> = clusters.iter().map(|c| c.members.len()).collect();
    assert_eq!(sizes, vec![7, 2]);
    assert_eq!(clusters[0].representative, villages[0]);
    assert_eq!(clusters[1].representative, villages[7]);
}

// ---------------------------------------------------------------------------
// Фронтир: остров в озере
// ---------------------------------------------------------------------------

#[test]
fn island_village_stays_nationless() {
    let mut grid = with_water(15, 9, |c| (6..=12).contains(&c.col) && !(c.col == 9 && c.row == 4));
    let capital = grid
        .place_settlement(civgen::HexCoord::new(2, 4), SettlementTier::City, 3000)
        .unwrap();
    let island = grid
        .place_settlement(civgen::HexCoord::new(9, 4), SettlementTier::Village, 80)
        .unwrap();

    let mut settings = CivilizationSettings::default();
    settings.nations.num_nations = 1;
    let civ = generate_civilization(&mut grid, &settings, &NullReporter).unwrap();

    assert_eq!(civ.capitals, vec![capital]);
    assert_eq!(grid[island].nation_id, NO_NATION);
    assert_eq!(grid[island].parent_hex_id, None);
    assert_eq!(grid[island].territory_id, Some(island));
    assert_eq!(civ.territory.frontier_settlements, 1);
    let village_pass = civ
        .tiers
        .iter()
        .find(|t| t.tier == SettlementTier::Village)
        .unwrap();
    assert_eq!(village_pass.nationless, 1);
    assert_eq!(village_pass.feeder_roads, 0);
}

// ---------------------------------------------------------------------------
// Территории: равные претенденты на перешейке
// ---------------------------------------------------------------------------

#[test]
fn land_bridge_tie_goes_to_first_seed() {
    let mut grid = flat(7, 1);
    let west = grid
        .place_settlement(civgen::HexCoord::new(0, 0), SettlementTier::Capital, 1000)
        .unwrap();
    let east = grid
        .place_settlement(civgen::HexCoord::new(6, 0), SettlementTier::Capital, 1000)
        .unwrap();
    grid[west].nation_id = 1;
    grid[east].nation_id = 2;

    propagate_territory(&mut grid, &TerritorySettings::default());

    let nations: Vec<u32> = (0..7).map(|col| grid[idx(&grid, col, 0)].nation_id).collect();
    assert_eq!(nations, vec![1, 1, 1, 1, 2, 2, 2]);
    assert_eq!(grid[idx(&grid, 3, 0)].territory_id, Some(west));
    assert_eq!(grid[idx(&grid, 4, 0)].territory_id, Some(east));
}

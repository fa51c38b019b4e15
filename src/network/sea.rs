//! Морские пути между прибрежными хабами разных сухопутных компонент.

use super::RoadLevel;
use super::trunk::{Candidate, TrunkNetwork, sort_candidates};
use crate::config::{CostSettings, NetworkSettings};
use crate::cost::CostContext;
use crate::grid::Grid;
use crate::path::{PathResult, find_path_bounded};

/// Морской маршрут: промежуточные узлы — только вода, сходить на сушу
/// можно лишь в `target`.
#[must_use]
pub fn find_sea_route(
    grid: &Grid,
    costs: &CostSettings,
    start: usize,
    target: usize,
    max_cost: f64,
) -> Option<PathResult> {
    let goal = grid.node(target)?.coord;
    find_path_bounded(
        grid.len(),
        start,
        |n| n == target,
        |n| grid.neighbors(n).iter().copied(),
        |a, b| {
            if b == target && grid[a].is_water {
                costs.sea_step_cost
            } else {
                costs.edge_cost(&grid[a], &grid[b], CostContext::SEA)
            }
        },
        |n| f64::from(grid[n].coord.distance(goal)) * costs.sea_step_cost,
        max_cost,
    )
}

/// Дополняет остовный лес морскими путями (тот же Краскал поверх того же
/// union-find). Возвращает число добавленных путей.
pub fn link_sea_routes(
    grid: &Grid,
    network: &mut TrunkNetwork,
    costs: &CostSettings,
    settings: &NetworkSettings,
) -> usize {
    if network.components() <= 1 {
        return 0;
    }

    let coastal: Vec<usize> = (0..network.hubs.len())
        .filter(|&pos| grid.is_coastal(network.hubs[pos]))
        .collect();

    let mut candidates = Vec::new();
    for (i, &a) in coastal.iter().enumerate() {
        for &b in &coastal[i + 1..] {
            if network.connected(a, b) {
                continue;
            }
            if let Some(route) = find_sea_route(
                grid,
                costs,
                network.hubs[a],
                network.hubs[b],
                settings.max_sea_route_cost,
            ) {
                candidates.push(Candidate { a, b, route });
            }
        }
    }

    sort_candidates(&mut candidates);
    let mut added = 0;
    for candidate in &candidates {
        if network.accept(grid, candidate, RoadLevel::SeaRoute) {
            added += 1;
        }
    }

    if added > 0 {
        tracing::info!(
            "⛵ Морские пути: {} добавлено, компонент осталось {}",
            added,
            network.components()
        );
    }
    added
}

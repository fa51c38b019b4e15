//! Подъездные дороги: от поселения до ближайшего узла уже проложенной сети.

use super::{RoadLevel, RoadNetwork};
use crate::config::CostSettings;
use crate::cost::CostContext;
use crate::grid::{Grid, NationId};
use crate::path::{PathResult, find_path_bounded};

/// A*, цель которого — хаб `hub` или любой узел дороги класса не ниже
/// `threshold`, принадлежащей нации `nation` (или нейтральной).
///
/// Поэтому подъездная дорога вливается в ближайшую дорогу, а не обязательно
/// тянется к центру хаба. Целей много, расстояние до хаба не оценивает
/// расстояние до ближайшей из них снизу, так что эвристика нулевая.
///
/// Если старт уже лежит на подходящей дороге, путь состоит из одного узла.
#[allow(clippy::too_many_arguments)]
#[must_use]
pub fn find_path_to_existing_network(
    grid: &Grid,
    roads: &RoadNetwork,
    costs: &CostSettings,
    start: usize,
    hub: usize,
    nation: NationId,
    threshold: RoadLevel,
    max_cost: f64,
) -> Option<PathResult> {
    if hub >= grid.len() {
        return None;
    }
    let context = CostContext::owned_by(nation);
    find_path_bounded(
        grid.len(),
        start,
        |n| n == hub || roads.joins(n, nation, threshold),
        |n| grid.neighbors(n).iter().copied(),
        |a, b| costs.edge_cost(&grid[a], &grid[b], context),
        |_| 0.0,
        max_cost,
    )
}

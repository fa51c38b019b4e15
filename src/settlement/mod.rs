//! Иерархия поселений: столицы, кластеры деревень и привязка к хабам.

pub mod affiliation;
pub mod capital;
pub mod cluster;

pub use affiliation::{AFFILIATION_ORDER, TierReport, resolve_tier, road_level_for};
pub use capital::{CapitalSelection, region_of, select_capitals};
pub use cluster::{Cluster, aggregate_clusters};

use std::cmp::Ordering;

use crate::grid::Grid;

/// Порядок «лучшее поселение первым»: население по убыванию, затем индекс.
pub(crate) fn by_population_desc(grid: &Grid, a: usize, b: usize) -> Ordering {
    grid[b]
        .population
        .cmp(&grid[a].population)
        .then(a.cmp(&b))
}

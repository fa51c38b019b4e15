use std::collections::BinaryHeap;

use serde::Serialize;

use super::{QueueEntry, reconstruct};
use crate::config::CostSettings;
use crate::cost::CostContext;
use crate::grid::Grid;

/// Найденный путь: индексы узлов от старта до цели и его суммарная стоимость.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathResult {
    pub path: Vec<usize>,
    pub total_cost: f64,
}

/// A* по произвольному графу с целью-предикатом.
///
/// `is_goal` позволяет искать «любой узел существующей сети», а не одну точку.
/// Ребро с бесконечной (или отрицательной) стоимостью считается отсутствующим.
/// Недостижимая цель — `None`.
pub fn find_path<G, N, I, C, H>(
    node_count: usize,
    start: usize,
    is_goal: G,
    neighbors_of: N,
    cost: C,
    heuristic: H,
) -> Option<PathResult>
where
    G: Fn(usize) -> bool,
    N: Fn(usize) -> I,
    I: IntoIterator<Item = usize>,
    C: Fn(usize, usize) -> f64,
    H: Fn(usize) -> f64,
{
    find_path_bounded(
        node_count,
        start,
        is_goal,
        neighbors_of,
        cost,
        heuristic,
        f64::INFINITY,
    )
}

/// То же, что [`find_path`], но состояния дороже `max_cost` не раскрываются.
pub fn find_path_bounded<G, N, I, C, H>(
    node_count: usize,
    start: usize,
    is_goal: G,
    neighbors_of: N,
    cost: C,
    heuristic: H,
    max_cost: f64,
) -> Option<PathResult>
where
    G: Fn(usize) -> bool,
    N: Fn(usize) -> I,
    I: IntoIterator<Item = usize>,
    C: Fn(usize, usize) -> f64,
    H: Fn(usize) -> f64,
{
    if start >= node_count {
        return None;
    }

    let mut g_score = vec![f64::INFINITY; node_count];
    let mut came_from: Vec<Option<usize>> = vec![None; node_count];
    let mut closed = vec![false; node_count];
    let mut open = BinaryHeap::new();
    let mut seq = 0u64;

    g_score[start] = 0.0;
    open.push(QueueEntry {
        priority: heuristic(start),
        cost: 0.0,
        node: start,
        seq,
    });

    while let Some(entry) = open.pop() {
        let current = entry.node;
        if closed[current] || entry.cost > g_score[current] {
            // Устаревшая запись в куче
            continue;
        }
        if is_goal(current) {
            return Some(PathResult {
                path: reconstruct(&came_from, current),
                total_cost: g_score[current],
            });
        }
        closed[current] = true;

        for next in neighbors_of(current) {
            if next >= node_count || closed[next] {
                continue;
            }
            let step = cost(current, next);
            if !step.is_finite() || step < 0.0 {
                continue;
            }
            let tentative = g_score[current] + step;
            if tentative > max_cost || tentative >= g_score[next] {
                continue;
            }
            g_score[next] = tentative;
            came_from[next] = Some(current);
            seq += 1;
            open.push(QueueEntry {
                priority: tentative + heuristic(next),
                cost: tentative,
                node: next,
                seq,
            });
        }
    }

    None
}

/// Путь между двумя узлами сетки по модели стоимости.
///
/// Эвристика — гексагональное расстояние × минимальная стоимость шага, она
/// допустима, пока каждый шаг стоит не меньше `min_step_cost`.
#[must_use]
pub fn find_route(
    grid: &Grid,
    costs: &CostSettings,
    start: usize,
    target: usize,
    context: CostContext,
) -> Option<PathResult> {
    let goal = grid.node(target)?.coord;
    let min_step = costs.min_step_cost(context.mode);
    find_path(
        grid.len(),
        start,
        |n| n == target,
        |n| grid.neighbors(n).iter().copied(),
        |a, b| costs.edge_cost(&grid[a], &grid[b], context),
        |n| f64::from(grid[n].coord.distance(goal)) * min_step,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{HexCoord, Terrain};

    fn line_neighbors(n: usize, len: usize) -> Vec<usize> {
        let mut out = Vec::new();
        if n > 0 {
            out.push(n - 1);
        }
        if n + 1 < len {
            out.push(n + 1);
        }
        out
    }

    #[test]
    fn walks_a_line() {
        let found =
            find_path(5, 0, |n| n == 4, |n| line_neighbors(n, 5), |_, _| 2.0, |_| 0.0).unwrap();
        assert_eq!(found.path, vec![0, 1, 2, 3, 4]);
        assert!((found.total_cost - 8.0).abs() < 1e-9);
    }

    #[test]
    fn start_satisfying_goal_is_trivial_path() {
        let found =
            find_path(3, 1, |n| n == 1, |n| line_neighbors(n, 3), |_, _| 1.0, |_| 0.0).unwrap();
        assert_eq!(found.path, vec![1]);
        assert_eq!(found.total_cost, 0.0);
    }

    #[test]
    fn infinite_edges_make_goal_unreachable() {
        let found = find_path(
            4,
            0,
            |n| n == 3,
            |n| line_neighbors(n, 4),
            |_, b| if b == 2 { f64::INFINITY } else { 1.0 },
            |_| 0.0,
        );
        assert!(found.is_none());
    }

    #[test]
    fn predicate_goal_stops_at_nearest_match() {
        let found = find_path(
            10,
            5,
            |n| n == 1 || n == 8,
            |n| line_neighbors(n, 10),
            |_, _| 1.0,
            |_| 0.0,
        )
        .unwrap();
        assert_eq!(found.path, vec![5, 6, 7, 8]);
    }

    #[test]
    fn bound_prunes_expensive_paths() {
        let found = find_path_bounded(
            10,
            0,
            |n| n == 9,
            |n| line_neighbors(n, 10),
            |_, _| 1.0,
            |_| 0.0,
            5.0,
        );
        assert!(found.is_none());
    }

    #[test]
    fn invalid_start_is_no_path() {
        assert!(find_path(3, 7, |_| true, |n| line_neighbors(n, 3), |_, _| 1.0, |_| 0.0).is_none());
    }

    #[test]
    fn route_detours_around_a_lake() {
        // Озеро в столбце 3, кроме нижней строки
        let grid = Grid::from_terrain(7, 6, |c| {
            if c.col == 3 && c.row < 5 {
                Terrain::water()
            } else {
                Terrain::land(0.2)
            }
        })
        .unwrap();
        let costs = CostSettings::default();
        let a = grid.index_of(HexCoord::new(1, 0)).unwrap();
        let b = grid.index_of(HexCoord::new(5, 0)).unwrap();
        let route = find_route(&grid, &costs, a, b, CostContext::LAND).unwrap();
        assert_eq!(*route.path.first().unwrap(), a);
        assert_eq!(*route.path.last().unwrap(), b);
        assert!(route.path.iter().all(|&n| !grid[n].is_water));
        assert!(route.path.iter().any(|&n| grid[n].coord.row == 5));
        assert!(route.total_cost > f64::from(grid.distance(a, b)));
    }

    #[test]
    fn flat_route_costs_hex_distance() {
        let grid = Grid::from_terrain(12, 12, |_| Terrain::land(0.2)).unwrap();
        let costs = CostSettings::default();
        let a = grid.index_of(HexCoord::new(2, 2)).unwrap();
        let b = grid.index_of(HexCoord::new(9, 7)).unwrap();
        let route = find_route(&grid, &costs, a, b, CostContext::LAND).unwrap();
        assert!((route.total_cost - f64::from(grid.distance(a, b))).abs() < 1e-9);
        assert_eq!(route.path.len() as u32, grid.distance(a, b) + 1);
    }
}

//! Группировка соседних деревень в кластеры ограниченного размера.

use std::collections::VecDeque;

use serde::Serialize;

use super::by_population_desc;
use crate::grid::Grid;

/// Кластер: представитель (самое населённое поселение) и все участники,
/// включая представителя.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cluster {
    pub representative: usize,
    pub members: Vec<usize>,
}

impl Cluster {
    #[must_use]
    pub fn single(idx: usize) -> Self {
        Self {
            representative: idx,
            members: vec![idx],
        }
    }
}

const NOT_MEMBER: u8 = 0;
const UNVISITED: u8 = 1;
const VISITED: u8 = 2;

/// Жадный ограниченный BFS: от самой населённой ещё не распределённой деревни
/// поглощаем смежных (в пределах `link_distance` гексов) участников, пока
/// кластер не достигнет `max_size`.
///
/// Каждый вход попадает ровно в один кластер; индексы вне сетки и повторы
/// отбрасываются.
#[must_use]
pub fn aggregate_clusters(
    grid: &Grid,
    members: &[usize],
    max_size: usize,
    link_distance: u32,
) -> Vec<Cluster> {
    let cap = max_size.max(1);
    let mut state = vec![NOT_MEMBER; grid.len()];
    let mut order = Vec::with_capacity(members.len());
    for &idx in members {
        if idx < grid.len() && state[idx] == NOT_MEMBER {
            state[idx] = UNVISITED;
            order.push(idx);
        }
    }
    order.sort_by(|&a, &b| by_population_desc(grid, a, b));

    let mut clusters = Vec::new();
    let mut queue = VecDeque::new();

    for &seed in &order {
        if state[seed] != UNVISITED {
            continue;
        }
        state[seed] = VISITED;
        let mut cluster = vec![seed];
        queue.clear();
        queue.push_back(seed);

        'grow: while let Some(current) = queue.pop_front() {
            if cluster.len() >= cap {
                break;
            }
            for next in linked(grid, current, link_distance) {
                if state.get(next) != Some(&UNVISITED) {
                    continue;
                }
                state[next] = VISITED;
                cluster.push(next);
                queue.push_back(next);
                if cluster.len() >= cap {
                    break 'grow;
                }
            }
        }

        let representative = cluster
            .iter()
            .copied()
            .min_by(|&a, &b| by_population_desc(grid, a, b))
            .unwrap_or(seed);
        clusters.push(Cluster {
            representative,
            members: cluster,
        });
    }

    tracing::debug!(
        "Кластеры: {} поселений → {} кластеров (предел {})",
        order.len(),
        clusters.len(),
        cap
    );
    clusters
}

fn linked(grid: &Grid, idx: usize, link_distance: u32) -> Vec<usize> {
    if link_distance <= 1 {
        grid.neighbors(idx).to_vec()
    } else {
        grid.within(idx, link_distance)
            .into_iter()
            .filter(|&n| n != idx)
            .collect()
    }
}

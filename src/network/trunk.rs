// src/network/trunk.rs
//! Магистральная сеть между крупнейшими хабами (алгоритм Краскала).

use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::{RoadLevel, RoadSegment};
use crate::config::{CostSettings, NetworkSettings};
use crate::cost::CostContext;
use crate::grid::{Grid, NO_NATION};
use crate::path::{PathResult, find_route};
use crate::progress::{GROUP_TRUNK, Reporter};

/// Остовный лес над хабами. Вершины графа — позиции в `hubs`,
/// вес вершины — индекс узла сетки, вес ребра — стоимость пути.
#[derive(Debug, Clone)]
pub struct TrunkNetwork {
    pub hubs: Vec<usize>,
    pub segments: Vec<RoadSegment>,
    pub graph: UnGraph<usize, f64>,
    union: UnionFind<usize>,
}

/// Кандидат в рёбра: пара позиций в `hubs` и найденный между ними путь.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub a: usize,
    pub b: usize,
    pub route: PathResult,
}

impl TrunkNetwork {
    fn new(hubs: Vec<usize>) -> Self {
        let mut graph = UnGraph::with_capacity(hubs.len(), hubs.len().saturating_sub(1));
        for &hub in &hubs {
            graph.add_node(hub);
        }
        let union = UnionFind::new(hubs.len());
        Self {
            hubs,
            segments: Vec::new(),
            graph,
            union,
        }
    }

    /// Число связных компонент (изолированный хаб — отдельная компонента).
    #[must_use]
    pub fn components(&self) -> usize {
        connected_components(&self.graph)
    }

    /// Лежат ли хабы на позициях `a` и `b` в одной компоненте.
    #[must_use]
    pub fn connected(&self, a: usize, b: usize) -> bool {
        a < self.hubs.len() && b < self.hubs.len() && self.union.equiv(a, b)
    }

    /// Принимает ребро, только если оно соединяет разные компоненты.
    pub(crate) fn accept(&mut self, grid: &Grid, candidate: &Candidate, level: RoadLevel) -> bool {
        let (a, b) = (candidate.a, candidate.b);
        if !self.union.union(a, b) {
            return false;
        }
        let (ha, hb) = (self.hubs[a], self.hubs[b]);
        let nation = if grid[ha].nation_id == grid[hb].nation_id {
            grid[ha].nation_id
        } else {
            NO_NATION
        };
        self.graph
            .add_edge(NodeIndex::new(a), NodeIndex::new(b), candidate.route.total_cost);
        self.segments.push(RoadSegment::new(
            grid,
            &candidate.route.path,
            level,
            nation,
            (ha, hb),
            candidate.route.total_cost,
        ));
        true
    }
}

/// Детерминированный порядок кандидатов: стоимость, затем позиции пары.
pub(crate) fn sort_candidates(candidates: &mut [Candidate]) {
    candidates.sort_by(|x, y| {
        x.route
            .total_cost
            .total_cmp(&y.route.total_cost)
            .then(x.a.cmp(&y.a))
            .then(x.b.cmp(&y.b))
    });
}

/// Строит магистрали: попарный A* между всеми хабами, сортировка рёбер по
/// стоимости и жадный выбор через систему непересекающихся множеств.
///
/// Хабы вне сетки, на воде и повторы отбрасываются. Результат — ровно
/// `H − k` рёбер для `k` компонент достижимости.
pub fn build_trunk_network(
    grid: &Grid,
    hubs: &[usize],
    costs: &CostSettings,
    settings: &NetworkSettings,
    reporter: &dyn Reporter,
) -> TrunkNetwork {
    let mut valid: Vec<usize> = hubs
        .iter()
        .copied()
        .filter(|&h| grid.node(h).is_some_and(|n| !n.is_water))
        .collect();
    valid.sort_unstable();
    valid.dedup();
    if valid.len() != hubs.len() {
        tracing::warn!(
            "Магистрали: отброшено {} недопустимых хабов",
            hubs.len() - valid.len()
        );
    }

    let mut network = TrunkNetwork::new(valid);
    let hub_count = network.hubs.len();
    if hub_count < 2 {
        tracing::warn!("Магистрали: хабов {} — строить нечего", hub_count);
        return network;
    }

    let pairs: Vec<(usize, usize)> = (0..hub_count)
        .flat_map(|a| ((a + 1)..hub_count).map(move |b| (a, b)))
        .collect();
    let total = pairs.len();
    let chunk_size = settings.progress_interval.max(1);

    let mut candidates = Vec::with_capacity(total);
    let mut done = 0;
    for chunk in pairs.chunks(chunk_size) {
        candidates.extend(search_pairs(grid, &network.hubs, chunk, costs));
        done += chunk.len();
        reporter.report(
            &format!("Магистрали: проверено {done}/{total} пар хабов"),
            Some(GROUP_TRUNK),
        );
    }

    sort_candidates(&mut candidates);
    for candidate in &candidates {
        if network.segments.len() + 1 == hub_count {
            break;
        }
        network.accept(grid, candidate, RoadLevel::Trunk);
    }

    tracing::info!(
        "🛣️ Магистрали: {} хабов, {} достижимых пар, {} рёбер, {} компонент",
        hub_count,
        candidates.len(),
        network.segments.len(),
        network.components()
    );
    network
}

#[cfg(feature = "parallel")]
fn search_pairs(
    grid: &Grid,
    hubs: &[usize],
    pairs: &[(usize, usize)],
    costs: &CostSettings,
) -> Vec<Candidate> {
    pairs
        .par_iter()
        .filter_map(|&(a, b)| {
            find_route(grid, costs, hubs[a], hubs[b], CostContext::LAND)
                .map(|route| Candidate { a, b, route })
        })
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn search_pairs(
    grid: &Grid,
    hubs: &[usize],
    pairs: &[(usize, usize)],
    costs: &CostSettings,
) -> Vec<Candidate> {
    pairs
        .iter()
        .filter_map(|&(a, b)| {
            find_route(grid, costs, hubs[a], hubs[b], CostContext::LAND)
                .map(|route| Candidate { a, b, route })
        })
        .collect()
}

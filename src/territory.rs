// src/territory.rs
//! Распространение владения: заливка от заселённых хабов по суше.
//!
//! Каждый захваченный гекс получает нацию и корень территории своего
//! захватчика. Первый захват окончателен, поэтому результат — разбиение
//! по геодезически ближайшему владельцу в шагах сетки.

use std::collections::{BTreeMap, VecDeque};

use serde::Serialize;

use crate::config::TerritorySettings;
use crate::grid::{Grid, NO_NATION, NationId, SettlementTier};

/// Итоги прохода территорий.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TerritoryReport {
    pub seeds: usize,
    /// Гексы, захваченные заливкой (без предзахваченных поселений)
    pub claimed: usize,
    pub frontier_settlements: usize,
    /// Цепочки родителей, разорванные из-за цикла или лимита шагов
    pub broken_chains: usize,
}

/// Сводка по нации для экономического слоя.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NationSummary {
    pub nation_id: NationId,
    pub capital: Option<usize>,
    pub cells: usize,
    pub settlements: usize,
    pub population: u64,
}

/// Ищет корневой хаб узла, поднимаясь по `parent_hex_id`.
///
/// Корень — узел без родителя или без нации. При цикле или превышении
/// `max_hops` у узла, замыкающего цепочку, родитель сбрасывается: он
/// становится суверенным корнем. Родитель вне сетки тоже делает узел корнем.
pub fn resolve_root(grid: &mut Grid, idx: usize, max_hops: usize) -> Option<usize> {
    resolve_root_counted(grid, idx, max_hops).map(|(root, _)| root)
}

fn resolve_root_counted(grid: &mut Grid, idx: usize, max_hops: usize) -> Option<(usize, bool)> {
    grid.node(idx)?;
    let mut visited = vec![idx];
    let mut current = idx;
    loop {
        let node = &grid[current];
        let Some(parent) = node.parent_hex_id else {
            return Some((current, false));
        };
        if node.nation_id == NO_NATION || parent >= grid.len() {
            return Some((current, false));
        }
        let cycle = visited.contains(&parent);
        if cycle || visited.len() > max_hops {
            tracing::warn!(
                "Территории: {} в цепочке родителей у {}, узел становится суверенным",
                if cycle { "цикл" } else { "лимит шагов" },
                node.coord
            );
            grid[current].parent_hex_id = None;
            return Some((current, true));
        }
        visited.push(parent);
        current = parent;
    }
}

/// Многоисточниковая заливка владения.
///
/// 1. Все `territory_id` и нации не-поселений сбрасываются.
/// 2. Привязанные поселения (нация ≠ 0) получают корень своей цепочки.
/// 3. Поселения без нации становятся корнями-фронтирами сами себе.
/// 4. Из поселений с населением ≥ `min_seed_population` (ярус, затем
///    население по убыванию) идёт BFS по незанятой пригодной суше.
pub fn propagate_territory(grid: &mut Grid, settings: &TerritorySettings) -> TerritoryReport {
    let mut report = TerritoryReport::default();

    for node in grid.nodes_mut() {
        node.territory_id = None;
        if !node.is_settlement() {
            node.nation_id = NO_NATION;
        }
    }

    let settlements: Vec<usize> = grid.settlements().collect();
    let mut affiliated = Vec::with_capacity(settlements.len());
    for &idx in &settlements {
        if grid[idx].nation_id == NO_NATION {
            let node = &mut grid[idx];
            node.parent_hex_id = None;
            node.territory_id = Some(idx);
            report.frontier_settlements += 1;
            continue;
        }
        if let Some((_, true)) = resolve_root_counted(grid, idx, settings.max_parent_hops) {
            report.broken_chains += 1;
        }
        affiliated.push(idx);
    }

    // Разрывы только укорачивают цепочки, поэтому второй подъём уже
    // ничего не рвёт и видит окончательные корни.
    let mut seeds = Vec::new();
    for idx in affiliated {
        let Some(root) = resolve_root(grid, idx, settings.max_parent_hops) else {
            continue;
        };
        let node = &mut grid[idx];
        node.territory_id = Some(root);
        if node.population >= settings.min_seed_population {
            seeds.push(idx);
        }
    }

    seeds.sort_by(|&a, &b| {
        let (na, nb) = (&grid[a], &grid[b]);
        nb.settlement_tier
            .cmp(&na.settlement_tier)
            .then(nb.population.cmp(&na.population))
            .then(a.cmp(&b))
    });
    report.seeds = seeds.len();

    let mut queue: VecDeque<usize> = seeds.into_iter().collect();
    while let Some(current) = queue.pop_front() {
        let nation = grid[current].nation_id;
        let territory = grid[current].territory_id;
        let neighbors = grid.neighbors(current).to_vec();
        for next in neighbors {
            let Some(node) = grid.node_mut(next) else {
                continue;
            };
            if node.territory_id.is_some()
                || node.is_water
                || node.elevation > settings.max_habitable_elevation
            {
                continue;
            }
            node.territory_id = territory;
            node.nation_id = nation;
            report.claimed += 1;
            queue.push_back(next);
        }
    }

    tracing::info!(
        "🗺️ Территории: {} центров, {} гексов, {} фронтирных поселений",
        report.seeds,
        report.claimed,
        report.frontier_settlements
    );
    report
}

/// Агрегаты по нациям: гексы, поселения, население, столица.
#[must_use]
pub fn summarize_nations(grid: &Grid) -> Vec<NationSummary> {
    let mut by_nation: BTreeMap<NationId, NationSummary> = BTreeMap::new();
    for (idx, node) in grid.nodes().iter().enumerate() {
        if node.nation_id == NO_NATION {
            continue;
        }
        let summary = by_nation.entry(node.nation_id).or_insert(NationSummary {
            nation_id: node.nation_id,
            capital: None,
            cells: 0,
            settlements: 0,
            population: 0,
        });
        summary.cells += 1;
        if node.is_settlement() {
            summary.settlements += 1;
            summary.population += u64::from(node.population);
            if node.settlement_tier == SettlementTier::Capital && summary.capital.is_none() {
                summary.capital = Some(idx);
            }
        }
    }
    by_nation.into_values().collect()
}

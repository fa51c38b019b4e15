// src/settlement/affiliation.rs
//! Привязка поселений яруса к ближайшему подходящему вышестоящему хабу.
//!
//! Ярусы обрабатываются строго сверху вниз, чтобы нижние могли привязываться
//! к уже привязанным верхним. Для каждой нации строится своё поле стоимости
//! по её хабам; кандидаты, не нашедшие своего хаба, проходят через общее
//! поле по всем хабам. Дальше `max_affiliation_cost` — фронтир без нации.

use std::collections::BTreeMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;

use super::cluster::{Cluster, aggregate_clusters};
use crate::config::{CivilizationSettings, CostSettings};
use crate::cost::CostContext;
use crate::grid::{Grid, NO_NATION, NationId, SettlementTier};
use crate::network::{RoadLevel, RoadNetwork, RoadSegment, find_path_to_existing_network};
use crate::path::CostField;

/// Порядок обработки ярусов (от старших к младшим).
pub const AFFILIATION_ORDER: [SettlementTier; 5] = [
    SettlementTier::City,
    SettlementTier::RegionalCapital,
    SettlementTier::Street,
    SettlementTier::Town,
    SettlementTier::Village,
];

/// Класс подъездной дороги яруса.
#[must_use]
pub fn road_level_for(tier: SettlementTier) -> RoadLevel {
    match tier {
        SettlementTier::Capital | SettlementTier::City | SettlementTier::RegionalCapital => {
            RoadLevel::Highway
        }
        SettlementTier::Street | SettlementTier::Town => RoadLevel::TownRoad,
        SettlementTier::Village | SettlementTier::None => RoadLevel::VillageRoad,
    }
}

/// Итоги привязки одного яруса.
#[derive(Debug, Clone, Serialize)]
pub struct TierReport {
    pub tier: SettlementTier,
    pub candidates: usize,
    pub clusters: usize,
    pub hubs: usize,
    /// Кластеры, привязанные к хабу своей нации
    pub same_nation: usize,
    /// Кластеры, привязанные через общее поле
    pub fallback: usize,
    /// Поселения, оставшиеся без нации
    pub nationless: usize,
    pub feeder_roads: usize,
}

impl TierReport {
    fn new(tier: SettlementTier) -> Self {
        Self {
            tier,
            candidates: 0,
            clusters: 0,
            hubs: 0,
            same_nation: 0,
            fallback: 0,
            nationless: 0,
            feeder_roads: 0,
        }
    }

    /// Поселения, получившие родителя.
    #[must_use]
    pub fn affiliated(&self) -> usize {
        self.candidates - self.nationless
    }
}

/// Найденный хаб и путь к нему по полю стоимости (от поселения к хабу).
#[derive(Debug, Clone)]
struct Resolution {
    hub: usize,
    cost: f64,
    trace: Vec<usize>,
}

/// Привязывает все поселения яруса `tier`: выставляет `parent_hex_id`,
/// `nation_id` и прокладывает по одной подъездной дороге на кластер.
pub fn resolve_tier(
    grid: &mut Grid,
    roads: &mut RoadNetwork,
    tier: SettlementTier,
    settings: &CivilizationSettings,
) -> TierReport {
    let mut report = TierReport::new(tier);
    let affiliation = &settings.affiliation;
    let max_cost = affiliation.max_affiliation_cost;

    let candidates: Vec<usize> = grid
        .settlements()
        .filter(|&idx| grid[idx].settlement_tier == tier && !grid[idx].is_water)
        .collect();
    report.candidates = candidates.len();
    if candidates.is_empty() {
        return report;
    }

    let clusters = if tier == SettlementTier::Village && affiliation.cluster_villages {
        aggregate_clusters(
            grid,
            &candidates,
            affiliation.max_cluster_size,
            affiliation.cluster_link_distance,
        )
    } else {
        candidates.iter().map(|&idx| Cluster::single(idx)).collect()
    };
    report.clusters = clusters.len();

    let hubs: Vec<usize> = grid
        .settlements()
        .filter(|&idx| grid[idx].settlement_tier > tier && grid[idx].nation_id != NO_NATION)
        .collect();
    report.hubs = hubs.len();

    let mut resolutions: Vec<Option<Resolution>> = vec![None; clusters.len()];

    if hubs.is_empty() {
        tracing::warn!(
            "Привязка ({}): нет вышестоящих хабов, {} поселений остаются без нации",
            tier.name(),
            candidates.len()
        );
    } else {
        // 1. Поля по нациям: предпочитаем хабы своей нации
        let mut by_nation: BTreeMap<NationId, Vec<usize>> = BTreeMap::new();
        for (ci, cluster) in clusters.iter().enumerate() {
            let nation = grid[cluster.representative].nation_id;
            if nation != NO_NATION {
                by_nation.entry(nation).or_default().push(ci);
            }
        }
        let nations: Vec<NationId> = by_nation.keys().copied().collect();
        let fields = build_nation_fields(grid, &hubs, &nations, &settings.costs, max_cost);

        for (nation, field) in &fields {
            for &ci in &by_nation[nation] {
                resolutions[ci] = accept(field, clusters[ci].representative, max_cost);
                if resolutions[ci].is_some() {
                    report.same_nation += 1;
                }
            }
        }

        // 2. Общее поле по всем хабам для оставшихся
        if resolutions.iter().any(Option::is_none) {
            let field = CostField::build(
                grid,
                &hubs,
                |a, b| settings.costs.edge_cost(&grid[a], &grid[b], CostContext::LAND),
                max_cost,
            );
            for (ci, cluster) in clusters.iter().enumerate() {
                if resolutions[ci].is_none() {
                    resolutions[ci] = accept(&field, cluster.representative, max_cost);
                    if resolutions[ci].is_some() {
                        report.fallback += 1;
                    }
                }
            }
        }
    }

    // 3. Применение: родитель, нация и подъездная дорога представителя
    let level = road_level_for(tier);
    for (cluster, resolution) in clusters.iter().zip(resolutions) {
        let Some(resolution) = resolution else {
            for &member in &cluster.members {
                let node = &mut grid[member];
                node.nation_id = NO_NATION;
                node.parent_hex_id = None;
            }
            report.nationless += cluster.members.len();
            continue;
        };

        let nation = grid[resolution.hub].nation_id;
        for &member in &cluster.members {
            let node = &mut grid[member];
            node.parent_hex_id = Some(resolution.hub);
            node.nation_id = nation;
        }

        let rep = cluster.representative;
        let bound = resolution.cost * affiliation.feeder_cost_slack + settings.costs.base_step_cost;
        let (path, cost) = match find_path_to_existing_network(
            grid,
            roads,
            &settings.costs,
            rep,
            resolution.hub,
            nation,
            level,
            bound,
        ) {
            Some(found) => (found.path, found.total_cost),
            None => (resolution.trace, resolution.cost),
        };
        if path.len() >= 2 {
            let segment = RoadSegment::new(grid, &path, level, nation, (rep, resolution.hub), cost);
            roads.push(grid, segment);
            report.feeder_roads += 1;
        }
    }

    tracing::debug!(
        "Привязка ({}): {} поселений, {} кластеров, своя нация {}, общее поле {}, без нации {}",
        tier.name(),
        report.candidates,
        report.clusters,
        report.same_nation,
        report.fallback,
        report.nationless
    );
    report
}

fn accept(field: &CostField, rep: usize, max_cost: f64) -> Option<Resolution> {
    let cost = field.cost(rep)?;
    if cost >= max_cost {
        return None;
    }
    Some(Resolution {
        hub: field.source_of(rep)?,
        cost,
        trace: field.path_to_source(rep)?,
    })
}

fn nation_field(
    grid: &Grid,
    hubs: &[usize],
    nation: NationId,
    costs: &CostSettings,
    max_cost: f64,
) -> Option<CostField> {
    let own: Vec<usize> = hubs
        .iter()
        .copied()
        .filter(|&h| grid[h].nation_id == nation)
        .collect();
    if own.is_empty() {
        return None;
    }
    let context = CostContext::owned_by(nation);
    Some(CostField::build(
        grid,
        &own,
        |a, b| costs.edge_cost(&grid[a], &grid[b], context),
        max_cost,
    ))
}

#[cfg(feature = "parallel")]
fn build_nation_fields(
    grid: &Grid,
    hubs: &[usize],
    nations: &[NationId],
    costs: &CostSettings,
    max_cost: f64,
) -> Vec<(NationId, CostField)> {
    nations
        .par_iter()
        .filter_map(|&nation| {
            nation_field(grid, hubs, nation, costs, max_cost).map(|f| (nation, f))
        })
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn build_nation_fields(
    grid: &Grid,
    hubs: &[usize],
    nations: &[NationId],
    costs: &CostSettings,
    max_cost: f64,
) -> Vec<(NationId, CostField)> {
    nations
        .iter()
        .filter_map(|&nation| {
            nation_field(grid, hubs, nation, costs, max_cost).map(|f| (nation, f))
        })
        .collect()
}

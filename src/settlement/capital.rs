// src/settlement/capital.rs
//! Выбор столиц по грубой сетке регионов.

use serde::Serialize;

use super::by_population_desc;
use crate::config::NationSettings;
use crate::grid::{Grid, NO_NATION, NationId, SettlementTier};

#[derive(Debug, Clone, Default, Serialize)]
pub struct CapitalSelection {
    /// Столицы; нация `i + 1` принадлежит `capitals[i]`
    pub capitals: Vec<usize>,
    /// Лучшие кандидаты регионов, не ставшие столицами
    pub regional_capitals: Vec<usize>,
    /// Запрошенное число наций (до урезания)
    pub requested: usize,
    /// Сколько поселений получили нацию по региону столицы
    pub seeded: usize,
}

/// Номер региона узла в тайлинге `region_cols × region_rows`.
#[must_use]
pub fn region_of(grid: &Grid, idx: usize, settings: &NationSettings) -> Option<usize> {
    let coord = grid.node(idx)?.coord;
    let cols = u64::from(settings.region_cols.max(1));
    let rows = u64::from(settings.region_rows.max(1));
    let rc = u64::from(coord.col) * cols / u64::from(grid.width());
    let rr = u64::from(coord.row) * rows / u64::from(grid.height());
    Some((rr * cols + rc) as usize)
}

/// Разбивает карту на регионы, в каждом берёт самое населённое подходящее
/// поселение, ранжирует кандидатов глобально и делает первых N столицами
/// с нациями `1..=N`.
///
/// Если кандидатов меньше, чем наций, N урезается до `max(1, доступно)`.
pub fn select_capitals(grid: &mut Grid, settings: &NationSettings) -> CapitalSelection {
    let region_count = (settings.region_cols.max(1) * settings.region_rows.max(1)) as usize;
    let mut best: Vec<Option<usize>> = vec![None; region_count];

    let eligible: Vec<usize> = grid
        .settlements()
        .filter(|&idx| {
            !grid[idx].is_water && grid[idx].settlement_tier >= settings.capital_min_tier
        })
        .collect();

    for idx in eligible {
        let Some(region) = region_of(grid, idx, settings) else {
            continue;
        };
        let slot = &mut best[region];
        match *slot {
            Some(current) if by_population_desc(grid, current, idx).is_le() => {}
            _ => *slot = Some(idx),
        }
    }

    let mut candidates: Vec<usize> = best.iter().flatten().copied().collect();
    candidates.sort_by(|&a, &b| by_population_desc(grid, a, b));

    let requested = settings.num_nations;
    let count = requested.max(1).min(candidates.len());
    if candidates.is_empty() {
        tracing::warn!("Столицы: нет подходящих поселений, нации не созданы");
    } else if count < requested || requested == 0 {
        tracing::warn!(
            "Столицы: запрошено {} наций, кандидатов {} — создаём {}",
            requested,
            candidates.len(),
            count
        );
    }

    let mut selection = CapitalSelection {
        requested,
        ..CapitalSelection::default()
    };

    for (rank, &idx) in candidates[..count].iter().enumerate() {
        let node = &mut grid[idx];
        node.settlement_tier = SettlementTier::Capital;
        node.nation_id = (rank + 1) as NationId;
        node.parent_hex_id = None;
        selection.capitals.push(idx);
    }

    // Столица у нации одна: прочие входные «столицы» становятся городами
    // и проходят привязку вместе с ярусом City.
    let demoted: Vec<usize> = grid
        .settlements()
        .filter(|&idx| grid[idx].settlement_tier == SettlementTier::Capital)
        .filter(|idx| !selection.capitals.contains(idx))
        .collect();
    for &idx in &demoted {
        grid[idx].settlement_tier = SettlementTier::City;
    }
    if !demoted.is_empty() {
        tracing::warn!("Столицы: {} невыбранных столиц понижены до городов", demoted.len());
    }

    if settings.promote_regional_capitals {
        for &idx in &candidates[count..] {
            let node = &mut grid[idx];
            if node.settlement_tier < SettlementTier::RegionalCapital {
                node.settlement_tier = SettlementTier::RegionalCapital;
            }
            selection.regional_capitals.push(idx);
        }
    }

    if settings.seed_nations_by_region {
        selection.seeded = seed_region_nations(grid, &selection.capitals, settings);
    }

    tracing::info!(
        "👑 Столицы: {} (регионов {}, региональных центров {})",
        selection.capitals.len(),
        region_count,
        selection.regional_capitals.len()
    );
    selection
}

/// Поселения без нации в регионе столицы получают её нацию предварительно:
/// так у привязки ярусов появляется разбиение кандидатов по нациям.
fn seed_region_nations(grid: &mut Grid, capitals: &[usize], settings: &NationSettings) -> usize {
    let region_count = (settings.region_cols.max(1) * settings.region_rows.max(1)) as usize;
    let mut region_nation = vec![NO_NATION; region_count];
    for &capital in capitals {
        if let Some(region) = region_of(grid, capital, settings) {
            region_nation[region] = grid[capital].nation_id;
        }
    }

    let targets: Vec<(usize, NationId)> = grid
        .settlements()
        .filter(|&idx| grid[idx].nation_id == NO_NATION)
        .filter_map(|idx| {
            let nation = region_nation[region_of(grid, idx, settings)?];
            (nation != NO_NATION).then_some((idx, nation))
        })
        .collect();

    for &(idx, nation) in &targets {
        grid[idx].nation_id = nation;
    }
    targets.len()
}

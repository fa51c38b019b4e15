// src/pipeline.rs
//! Полный проход вывода цивилизации над готовой сеткой.
//!
//! Фазы строго по порядку: столицы → магистрали (и морские пути) →
//! привязка ярусов сверху вниз → территории. Сетка мутируется на месте.

use serde::Serialize;

use crate::config::CivilizationSettings;
use crate::error::Result;
use crate::grid::Grid;
use crate::network::{RoadNetwork, RoadSegment, build_trunk_network, link_sea_routes};
use crate::progress::{GROUP_AFFILIATION, Reporter};
use crate::settlement::{AFFILIATION_ORDER, TierReport, resolve_tier, select_capitals};
use crate::territory::{TerritoryReport, propagate_territory};

/// Результат прохода: всё, что не записано в узлы сетки.
#[derive(Debug, Clone, Serialize)]
pub struct Civilization {
    pub capitals: Vec<usize>,
    pub regional_capitals: Vec<usize>,
    /// Все участки дорог в порядке прокладки
    pub roads: Vec<RoadSegment>,
    pub trunk_hubs: usize,
    pub trunk_components: usize,
    pub sea_routes: usize,
    pub tiers: Vec<TierReport>,
    pub territory: TerritoryReport,
}

/// Выводит столицы, дороги, иерархию и территории.
///
/// Ошибка возможна только при несогласованных настройках; недостижимые
/// поселения — законный результат (фронтир без нации).
pub fn generate_civilization(
    grid: &mut Grid,
    settings: &CivilizationSettings,
    reporter: &dyn Reporter,
) -> Result<Civilization> {
    settings.validate()?;

    // 1. Столицы
    let selection = select_capitals(grid, &settings.nations);
    reporter.report(
        &format!("Столицы выбраны: {}", selection.capitals.len()),
        None,
    );

    // 2. Магистрали между крупнейшими хабами
    let hubs: Vec<usize> = grid
        .settlements()
        .filter(|&idx| grid[idx].settlement_tier >= settings.network.trunk_min_tier)
        .collect();
    let mut trunk = build_trunk_network(grid, &hubs, &settings.costs, &settings.network, reporter);
    let sea_routes = if settings.network.sea_routes {
        link_sea_routes(grid, &mut trunk, &settings.costs, &settings.network)
    } else {
        0
    };
    let trunk_hubs = trunk.hubs.len();
    let trunk_components = trunk.components();
    reporter.report(
        &format!(
            "Магистральная сеть готова: {} участков, {} компонент",
            trunk.segments.len(),
            trunk_components
        ),
        None,
    );

    let mut roads = RoadNetwork::new(grid.len());
    roads.extend(grid, trunk.segments);

    // 3. Привязка ярусов
    let mut tiers = Vec::with_capacity(AFFILIATION_ORDER.len());
    for tier in AFFILIATION_ORDER {
        let report = resolve_tier(grid, &mut roads, tier, settings);
        reporter.report(
            &format!(
                "Привязка «{}»: {} из {} поселений, {} без нации",
                tier.name(),
                report.affiliated(),
                report.candidates,
                report.nationless
            ),
            Some(GROUP_AFFILIATION),
        );
        tiers.push(report);
    }

    // 4. Территории
    let territory = propagate_territory(grid, &settings.territory);
    reporter.report(
        &format!("Территории распределены: {} гексов", territory.claimed),
        None,
    );

    tracing::info!(
        "🏰 Цивилизация: {} наций, {} дорог",
        selection.capitals.len(),
        roads.len()
    );

    Ok(Civilization {
        capitals: selection.capitals,
        regional_capitals: selection.regional_capitals,
        roads: roads.into_segments(),
        trunk_hubs,
        trunk_components,
        sea_routes,
        tiers,
        territory,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{HexCoord, SettlementTier, Terrain};
    use crate::network::RoadLevel;
    use crate::progress::NullReporter;
    use std::cell::RefCell;

    fn two_kingdoms() -> Grid {
        let mut grid = Grid::from_terrain(24, 12, |_| Terrain::land(0.2)).unwrap();
        grid.place_settlement(HexCoord::new(3, 3), SettlementTier::City, 5000).unwrap();
        grid.place_settlement(HexCoord::new(20, 8), SettlementTier::City, 4000).unwrap();
        grid.place_settlement(HexCoord::new(6, 5), SettlementTier::Town, 600).unwrap();
        grid.place_settlement(HexCoord::new(17, 9), SettlementTier::Town, 500).unwrap();
        grid.place_settlement(HexCoord::new(8, 8), SettlementTier::Village, 60).unwrap();
        grid.place_settlement(HexCoord::new(15, 2), SettlementTier::Village, 40).unwrap();
        grid
    }

    #[test]
    fn whole_pass_links_every_settlement() {
        let mut grid = two_kingdoms();
        let mut settings = CivilizationSettings::default();
        settings.nations.num_nations = 2;
        let civ = generate_civilization(&mut grid, &settings, &NullReporter).unwrap();

        assert_eq!(civ.capitals.len(), 2);
        assert_eq!(civ.trunk_components, 1);
        assert_eq!(civ.roads.iter().filter(|r| r.level == RoadLevel::Trunk).count(), 1);
        for idx in grid.settlements() {
            assert_ne!(grid[idx].nation_id, 0, "{} без нации", grid[idx].coord);
            let root = grid[idx].territory_id.unwrap();
            assert_eq!(grid[root].settlement_tier, SettlementTier::Capital);
        }
        assert!(grid.nodes().iter().all(|n| n.territory_id.is_some()));
    }

    #[test]
    fn reports_every_phase() {
        let mut grid = two_kingdoms();
        let groups = RefCell::new(Vec::new());
        let reporter =
            |_: &str, group: Option<&str>| groups.borrow_mut().push(group.map(str::to_string));
        generate_civilization(&mut grid, &CivilizationSettings::default(), &reporter).unwrap();

        let groups = groups.into_inner();
        let affiliation = groups
            .iter()
            .filter(|g| g.as_deref() == Some(GROUP_AFFILIATION))
            .count();
        assert_eq!(affiliation, AFFILIATION_ORDER.len());
        assert_eq!(groups.iter().filter(|g| g.is_none()).count(), 3);
    }

    #[test]
    fn extra_input_capital_is_affiliated_to_the_chosen_one() {
        let mut grid = Grid::from_terrain(9, 9, |_| Terrain::land(0.2)).unwrap();
        let small = grid
            .place_settlement(HexCoord::new(0, 0), SettlementTier::Capital, 300)
            .unwrap();
        let big = grid
            .place_settlement(HexCoord::new(2, 2), SettlementTier::Capital, 5000)
            .unwrap();
        let mut settings = CivilizationSettings::default();
        settings.nations.num_nations = 1;
        let civ = generate_civilization(&mut grid, &settings, &NullReporter).unwrap();

        assert_eq!(civ.capitals, vec![big]);
        assert_eq!(grid[small].parent_hex_id, Some(big));
        assert_eq!(grid[small].territory_id, Some(big));
        let summary = crate::territory::summarize_nations(&grid);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].capital, Some(big));
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let mut grid = two_kingdoms();
        let mut settings = CivilizationSettings::default();
        settings.costs.foreign_multiplier = 0.5;
        assert!(generate_civilization(&mut grid, &settings, &NullReporter).is_err());
    }
}

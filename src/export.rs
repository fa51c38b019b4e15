// src/export.rs
//! JSON-выгрузка результата для рендера и экономического слоя.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::grid::{Grid, HexCoord, NationId, SettlementTier};
use crate::network::RoadSegment;
use crate::pipeline::Civilization;
use crate::settlement::TierReport;
use crate::territory::{NationSummary, TerritoryReport, summarize_nations};

#[derive(Debug, Clone, Serialize)]
pub struct SettlementExport {
    pub coord: HexCoord,
    pub tier: SettlementTier,
    pub population: u32,
    pub nation_id: NationId,
    pub parent: Option<HexCoord>,
    pub territory: Option<HexCoord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CivilizationExport<'a> {
    pub width: u32,
    pub height: u32,
    pub capitals: Vec<HexCoord>,
    pub settlements: Vec<SettlementExport>,
    pub roads: &'a [RoadSegment],
    pub nations: Vec<NationSummary>,
    pub tiers: &'a [TierReport],
    pub territory: &'a TerritoryReport,
}

impl<'a> CivilizationExport<'a> {
    /// Индексы сетки переводятся в координаты: снаружи арены они бессмысленны.
    #[must_use]
    pub fn new(grid: &Grid, civ: &'a Civilization) -> Self {
        let coord_of = |idx: usize| grid.node(idx).map(|n| n.coord);
        let settlements = grid
            .settlements()
            .map(|idx| {
                let node = &grid[idx];
                SettlementExport {
                    coord: node.coord,
                    tier: node.settlement_tier,
                    population: node.population,
                    nation_id: node.nation_id,
                    parent: node.parent_hex_id.and_then(coord_of),
                    territory: node.territory_id.and_then(coord_of),
                }
            })
            .collect();

        Self {
            width: grid.width(),
            height: grid.height(),
            capitals: civ.capitals.iter().filter_map(|&idx| coord_of(idx)).collect(),
            settlements,
            roads: &civ.roads,
            nations: summarize_nations(grid),
            tiers: &civ.tiers,
            territory: &civ.territory,
        }
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}

#![allow(dead_code)]

use civgen::config::SyntheticSettings;
use civgen::{Grid, HexCoord, Terrain, WorldCivParams};

/// Ровная суша без растительных штрафов: шаг стоит ровно 1.
pub fn flat(width: u32, height: u32) -> Grid {
    Grid::from_terrain(width, height, |_| Terrain::land(0.2)).unwrap()
}

/// Суша везде, кроме гексов, для которых `is_water` истинно.
pub fn with_water(width: u32, height: u32, is_water: impl Fn(HexCoord) -> bool) -> Grid {
    Grid::from_terrain(width, height, |c| {
        if is_water(c) {
            Terrain::water()
        } else {
            Terrain::land(0.2)
        }
    })
    .unwrap()
}

pub fn idx(grid: &Grid, col: u32, row: u32) -> usize {
    grid.index_of(HexCoord::new(col, row)).unwrap()
}

/// Небольшой синтетический мир, на котором полный проход занимает доли секунды.
pub fn small_world(seed: u64) -> WorldCivParams {
    let mut params = WorldCivParams {
        seed,
        width: 80,
        height: 60,
        synthetic: SyntheticSettings {
            num_cities: 6,
            num_towns: 20,
            num_villages: 120,
            city_spacing: 6,
            ..SyntheticSettings::default()
        },
        ..WorldCivParams::default()
    };
    params.civilization.nations.num_nations = 4;
    params
}

// src/synthetic.rs
//! Синтетический континент для CLI и тестов: рельеф из шума и расстановка
//! поселений. Полноценный генератор ландшафта живёт снаружи; здесь только
//! достаточно правдоподобный вход для вывода цивилизации.

use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::{SyntheticSettings, WorldCivParams};
use crate::error::Result;
use crate::grid::{Grid, SettlementTier, Terrain, Vegetation};

/// Генерирует сетку с рельефом и неприсоединёнными поселениями.
///
/// Детерминирована по `params.seed`.
pub fn generate_world(params: &WorldCivParams) -> Result<Grid> {
    params.validate()?;
    let terrain = generate_terrain(params.seed, params.width, params.height, &params.synthetic);
    let width = params.width;
    let mut grid = Grid::from_terrain(params.width, params.height, |c| {
        terrain[(c.row * width + c.col) as usize]
    })?;
    let placed = place_settlements(&mut grid, params.seed, &params.synthetic);

    let land = grid.nodes().iter().filter(|n| !n.is_water).count();
    tracing::info!(
        "🌍 Синтетический мир {}×{}: суша {:.0}%, поселений {}",
        params.width,
        params.height,
        100.0 * land as f64 / grid.len() as f64,
        placed
    );
    Ok(grid)
}

fn noise(seed: i32, frequency: f32, octaves: i32) -> FastNoiseLite {
    let mut noise = FastNoiseLite::new();
    noise.set_seed(Some(seed));
    noise.set_noise_type(Some(NoiseType::OpenSimplex2));
    noise.set_fractal_type(Some(FractalType::FBm));
    noise.set_fractal_octaves(Some(octaves));
    noise.set_frequency(Some(frequency));
    noise
}

/// Рельеф в порядке `row * width + col`.
fn generate_terrain(
    seed: u64,
    width: u32,
    height: u32,
    settings: &SyntheticSettings,
) -> Vec<Terrain> {
    let base = seed as i32;
    let elevation = noise(base, settings.noise_frequency, settings.octaves);
    let moisture = noise(base.wrapping_add(1_000_000), settings.noise_frequency * 1.5, 3);
    let rivers = noise(base.wrapping_add(2_000_000), settings.noise_frequency * 0.8, 2);

    let sample = |i: u32| -> Terrain {
        let x = (i % width) as f32;
        let y = (i / width) as f32;

        // Радиальный спад: к краям карты — океан
        let dx = (x / width as f32 - 0.5) * 2.0;
        let dy = (y / height as f32 - 0.5) * 2.0;
        let falloff = 1.0 - (dx * dx + dy * dy).sqrt();

        let value = (elevation.get_noise_2d(x, y) + 1.0) * 0.5;
        let e = (0.55 * value + 0.45 * falloff).clamp(0.0, 1.0);
        if e < settings.sea_level {
            return Terrain {
                elevation: e,
                ..Terrain::water()
            };
        }

        let m = (moisture.get_noise_2d(x, y) + 1.0) * 0.5;
        let vegetation = if e > 0.8 {
            Vegetation::Barren
        } else if m > 0.72 && e < 0.55 {
            Vegetation::Jungle
        } else if m > 0.5 {
            Vegetation::Forest
        } else if m > 0.2 {
            Vegetation::Grassland
        } else {
            Vegetation::Barren
        };

        // Узкие гребни шума — русла рек
        let flow = (1.0 - rivers.get_noise_2d(x, y).abs()).powi(8);

        Terrain {
            elevation: e,
            is_water: false,
            vegetation,
            flow,
        }
    };

    let indices = 0..width * height;
    #[cfg(feature = "parallel")]
    let indices = indices.into_par_iter();
    indices.map(sample).collect()
}

/// Пригодность гекса для поселения (до случайного разброса).
fn habitability(grid: &Grid, idx: usize) -> f32 {
    let node = &grid[idx];
    let mut score = match node.vegetation {
        Vegetation::Grassland => 1.0,
        Vegetation::Forest => 0.6,
        Vegetation::Jungle => 0.4,
        Vegetation::Barren => 0.2,
    };
    if node.elevation > 0.75 {
        score *= 0.1;
    }
    if grid.is_coastal(idx) {
        score *= 1.3;
    }
    if node.flow > 0.5 {
        score *= 1.2;
    }
    score
}

/// Суша по убыванию пригодности с разбросом ±20%.
fn ranked_sites(grid: &Grid, rng: &mut ChaCha8Rng) -> Vec<(usize, f32)> {
    let mut sites: Vec<(usize, f32)> = (0..grid.len())
        .filter(|&idx| !grid[idx].is_water)
        .map(|idx| (idx, habitability(grid, idx) * rng.gen_range(0.8..1.2)))
        .collect();
    sites.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    sites
}

/// Расставляет города, посёлки и деревни по убыванию пригодности
/// с ограничениями на расстояние. Возвращает число поселений.
fn place_settlements(grid: &mut Grid, seed: u64, settings: &SyntheticSettings) -> usize {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let candidates = ranked_sites(grid, &mut rng);

    let mut cities: Vec<usize> = Vec::new();
    let mut towns: Vec<usize> = Vec::new();

    for &(idx, _) in &candidates {
        if cities.len() >= settings.num_cities {
            break;
        }
        if cities.iter().all(|&c| grid.distance(c, idx) >= settings.city_spacing) {
            cities.push(idx);
        }
    }

    for &(idx, _) in &candidates {
        if towns.len() >= settings.num_towns {
            break;
        }
        let spaced = cities
            .iter()
            .chain(&towns)
            .all(|&s| grid.distance(s, idx) >= settings.town_spacing);
        if spaced {
            towns.push(idx);
        }
    }

    for &idx in &cities {
        grid[idx].settlement_tier = SettlementTier::City;
        grid[idx].population = rng.gen_range(2_000..8_000);
    }
    for &idx in &towns {
        grid[idx].settlement_tier = SettlementTier::Town;
        grid[idx].population = rng.gen_range(300..1_500);
    }

    let mut villages = 0;
    for &(idx, _) in &candidates {
        if villages >= settings.num_villages {
            break;
        }
        if grid[idx].is_settlement() {
            continue;
        }
        grid[idx].settlement_tier = SettlementTier::Village;
        grid[idx].population = rng.gen_range(20..200);
        villages += 1;
    }

    cities.len() + towns.len() + villages
}

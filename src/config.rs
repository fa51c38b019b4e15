// src/config.rs
//! Конфигурация вывода цивилизации
//!
//! Этот модуль определяет все параметры, управляющие построением цивилизации:
//! - Выбор столиц и число наций
//! - Модель стоимости перемещения по рельефу
//! - Магистральная сеть и морские пути
//! - Привязка поселений к вышестоящим хабам
//! - Распространение территорий
//!
//! Все структуры поддерживают сериализацию в TOML/JSON для удобной настройки
//! через конфигурационные файлы.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CivGenError, Result};
use crate::grid::SettlementTier;

/// Параметры выбора столиц и формирования наций
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NationSettings {
    /// Запрошенное число наций (урезается, если кандидатов меньше)
    #[serde(default = "default_num_nations")]
    pub num_nations: usize,

    /// Число столбцов грубой сетки регионов
    #[serde(default = "default_region_cols")]
    pub region_cols: u32,

    /// Число строк грубой сетки регионов
    #[serde(default = "default_region_rows")]
    pub region_rows: u32,

    /// Минимальный ранг поселения, которое может стать столицей
    #[serde(default = "default_capital_min_tier")]
    pub capital_min_tier: SettlementTier,

    /// Повышать лучших кандидатов регионов без столицы до `RegionalCapital`
    #[serde(default = "default_true")]
    pub promote_regional_capitals: bool,

    /// Предварительно назначать нацию столицы поселениям её региона
    #[serde(default = "default_true")]
    pub seed_nations_by_region: bool,
}

fn default_num_nations() -> usize {
    6
}
fn default_region_cols() -> u32 {
    3
}
fn default_region_rows() -> u32 {
    3
}
fn default_capital_min_tier() -> SettlementTier {
    SettlementTier::Town
}
fn default_true() -> bool {
    true
}

impl Default for NationSettings {
    fn default() -> Self {
        Self {
            num_nations: 6,
            region_cols: 3,
            region_rows: 3,
            capital_min_tier: SettlementTier::Town,
            promote_regional_capitals: true,
            seed_nations_by_region: true,
        }
    }
}

/// Модель стоимости перехода между соседними гексами
///
/// Стоимость шага по суше никогда не меньше `base_step_cost`, поэтому
/// гексагональное расстояние × `base_step_cost` — допустимая эвристика A*.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostSettings {
    /// Базовая стоимость шага по суше
    #[serde(default = "default_base_step_cost")]
    pub base_step_cost: f64,

    /// Надбавка за вход в лес
    #[serde(default = "default_forest_penalty")]
    pub forest_penalty: f64,

    /// Надбавка за вход в джунгли
    #[serde(default = "default_jungle_penalty")]
    pub jungle_penalty: f64,

    /// Высота, выше которой начинается горный штраф
    #[serde(default = "default_mountain_threshold")]
    pub mountain_threshold: f32,

    /// Масштаб горного штрафа на вершине (высота 1.0)
    #[serde(default = "default_mountain_scale")]
    pub mountain_scale: f64,

    /// Степень кривой горного штрафа:
    /// - `1.0` → линейно,
    /// - `>1.0` → предгорья дешёвые, пики очень дорогие.
    #[serde(default = "default_mountain_exponent")]
    pub mountain_exponent: f64,

    /// Штраф за перепад высот между гексами (на единицу |Δh|)
    #[serde(default = "default_gradient_scale")]
    pub gradient_scale: f64,

    /// Сток, начиная с которого гекс считается рекой
    #[serde(default = "default_river_threshold")]
    pub river_threshold: f32,

    /// Надбавка за вход в речной гекс (переправа)
    #[serde(default = "default_river_crossing_penalty")]
    pub river_crossing_penalty: f64,

    /// Множитель за вход на территорию чужой нации (при заданном владельце)
    #[serde(default = "default_foreign_multiplier")]
    pub foreign_multiplier: f64,

    /// Стоимость шага по воде для морских путей
    #[serde(default = "default_sea_step_cost")]
    pub sea_step_cost: f64,
}

fn default_base_step_cost() -> f64 {
    1.0
}
fn default_forest_penalty() -> f64 {
    2.0
}
fn default_jungle_penalty() -> f64 {
    4.0
}
fn default_mountain_threshold() -> f32 {
    0.6
}
fn default_mountain_scale() -> f64 {
    40.0
}
fn default_mountain_exponent() -> f64 {
    2.0
}
fn default_gradient_scale() -> f64 {
    10.0
}
fn default_river_threshold() -> f32 {
    0.5
}
fn default_river_crossing_penalty() -> f64 {
    1.5
}
fn default_foreign_multiplier() -> f64 {
    50.0
}
fn default_sea_step_cost() -> f64 {
    1.0
}

impl Default for CostSettings {
    fn default() -> Self {
        Self {
            base_step_cost: default_base_step_cost(),
            forest_penalty: default_forest_penalty(),
            jungle_penalty: default_jungle_penalty(),
            mountain_threshold: default_mountain_threshold(),
            mountain_scale: default_mountain_scale(),
            mountain_exponent: default_mountain_exponent(),
            gradient_scale: default_gradient_scale(),
            river_threshold: default_river_threshold(),
            river_crossing_penalty: default_river_crossing_penalty(),
            foreign_multiplier: default_foreign_multiplier(),
            sea_step_cost: default_sea_step_cost(),
        }
    }
}

/// Параметры магистральной сети
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkSettings {
    /// Минимальный ранг хаба магистральной сети
    #[serde(default = "default_trunk_min_tier")]
    pub trunk_min_tier: SettlementTier,

    /// Связывать несвязные по суше компоненты морскими путями
    #[serde(default = "default_true")]
    pub sea_routes: bool,

    /// Предельная стоимость одного морского пути
    #[serde(default = "default_max_sea_route_cost")]
    pub max_sea_route_cost: f64,

    /// Как часто (в парах хабов) сообщать о прогрессе перебора
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,
}

fn default_trunk_min_tier() -> SettlementTier {
    SettlementTier::City
}
fn default_max_sea_route_cost() -> f64 {
    120.0
}
fn default_progress_interval() -> usize {
    64
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            trunk_min_tier: SettlementTier::City,
            sea_routes: true,
            max_sea_route_cost: 120.0,
            progress_interval: 64,
        }
    }
}

/// Параметры привязки поселений к вышестоящим хабам
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AffiliationSettings {
    /// Предельная стоимость привязки: дальше поселение остаётся без нации
    #[serde(default = "default_max_affiliation_cost")]
    pub max_affiliation_cost: f64,

    /// Объединять деревни в кластеры перед поиском путей
    #[serde(default = "default_true")]
    pub cluster_villages: bool,

    /// Максимальный размер кластера деревень
    #[serde(default = "default_max_cluster_size")]
    pub max_cluster_size: usize,

    /// Расстояние в гексах, на котором деревни считаются смежными (1 = соседи)
    #[serde(default = "default_cluster_link_distance")]
    pub cluster_link_distance: u32,

    /// Запас стоимости для поиска подъездной дороги относительно стоимости привязки
    #[serde(default = "default_feeder_cost_slack")]
    pub feeder_cost_slack: f64,
}

fn default_max_affiliation_cost() -> f64 {
    300.0
}
fn default_max_cluster_size() -> usize {
    7
}
fn default_cluster_link_distance() -> u32 {
    1
}
fn default_feeder_cost_slack() -> f64 {
    1.5
}

impl Default for AffiliationSettings {
    fn default() -> Self {
        Self {
            max_affiliation_cost: 300.0,
            cluster_villages: true,
            max_cluster_size: 7,
            cluster_link_distance: 1,
            feeder_cost_slack: 1.5,
        }
    }
}

/// Параметры распространения территорий
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TerritorySettings {
    /// Минимальное население поселения, от которого растёт территория
    #[serde(default = "default_min_seed_population")]
    pub min_seed_population: u32,

    /// Гексы выше этой высоты непригодны для жизни и не захватываются
    #[serde(default = "default_max_habitable_elevation")]
    pub max_habitable_elevation: f32,

    /// Ограничение длины цепочки родителей при поиске корня
    #[serde(default = "default_max_parent_hops")]
    pub max_parent_hops: usize,
}

fn default_min_seed_population() -> u32 {
    200
}
fn default_max_habitable_elevation() -> f32 {
    0.9
}
fn default_max_parent_hops() -> usize {
    64
}

impl Default for TerritorySettings {
    fn default() -> Self {
        Self {
            min_seed_population: 200,
            max_habitable_elevation: 0.9,
            max_parent_hops: 64,
        }
    }
}

/// Все параметры вывода цивилизации над готовой сеткой
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CivilizationSettings {
    #[serde(default)]
    pub nations: NationSettings,
    #[serde(default)]
    pub costs: CostSettings,
    #[serde(default)]
    pub network: NetworkSettings,
    #[serde(default)]
    pub affiliation: AffiliationSettings,
    #[serde(default)]
    pub territory: TerritorySettings,
}

impl CivilizationSettings {
    /// Проверяет согласованность параметров.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(CivGenError::InvalidConfig(msg.to_string()));

        if self.costs.base_step_cost <= 0.0 {
            return invalid("costs.base_step_cost must be positive");
        }
        if self.costs.sea_step_cost <= 0.0 {
            return invalid("costs.sea_step_cost must be positive");
        }
        if self.costs.foreign_multiplier < 1.0 {
            return invalid("costs.foreign_multiplier must be >= 1.0");
        }
        let penalties = [
            self.costs.forest_penalty,
            self.costs.jungle_penalty,
            self.costs.mountain_scale,
            self.costs.gradient_scale,
            self.costs.river_crossing_penalty,
        ];
        // Отрицательный штраф ломает допустимость эвристики A*
        if penalties.iter().any(|p| p.is_nan() || *p < 0.0) {
            return invalid("costs penalties and scales must be non-negative");
        }
        if !(0.0..1.0).contains(&self.costs.mountain_threshold) {
            return invalid("costs.mountain_threshold must be in [0, 1)");
        }
        if self.nations.region_cols == 0 || self.nations.region_rows == 0 {
            return invalid("nations.region_cols and region_rows must be positive");
        }
        if self.affiliation.max_affiliation_cost <= 0.0 {
            return invalid("affiliation.max_affiliation_cost must be positive");
        }
        Ok(())
    }
}

/// Параметры синтетического ландшафта для CLI (замена внешнего генератора)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyntheticSettings {
    /// Уровень моря (высоты ниже — вода)
    #[serde(default = "default_sea_level")]
    pub sea_level: f32,

    /// Частота базового шума рельефа
    #[serde(default = "default_noise_frequency")]
    pub noise_frequency: f32,

    /// Число октав фрактального шума
    #[serde(default = "default_octaves")]
    pub octaves: i32,

    #[serde(default = "default_num_cities")]
    pub num_cities: usize,

    #[serde(default = "default_num_towns")]
    pub num_towns: usize,

    #[serde(default = "default_num_villages")]
    pub num_villages: usize,

    /// Минимальное расстояние между городами в гексах
    #[serde(default = "default_city_spacing")]
    pub city_spacing: u32,

    /// Минимальное расстояние между посёлками в гексах
    #[serde(default = "default_town_spacing")]
    pub town_spacing: u32,
}

fn default_sea_level() -> f32 {
    0.42
}
fn default_noise_frequency() -> f32 {
    0.035
}
fn default_octaves() -> i32 {
    4
}
fn default_num_cities() -> usize {
    14
}
fn default_num_towns() -> usize {
    60
}
fn default_num_villages() -> usize {
    400
}
fn default_city_spacing() -> u32 {
    8
}
fn default_town_spacing() -> u32 {
    3
}

impl Default for SyntheticSettings {
    fn default() -> Self {
        Self {
            sea_level: 0.42,
            noise_frequency: 0.035,
            octaves: 4,
            num_cities: 14,
            num_towns: 60,
            num_villages: 400,
            city_spacing: 8,
            town_spacing: 3,
        }
    }
}

/// Основные параметры генерации
///
/// Полная конфигурация для одного запуска CLI. Поддерживает загрузку из TOML-файлов.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorldCivParams {
    /// Сид генератора случайных чисел (детерминированная генерация)
    pub seed: u64,

    /// Ширина сетки в гексах (по умолчанию 160)
    #[serde(default = "default_width")]
    pub width: u32,

    /// Высота сетки в гексах (по умолчанию 120)
    #[serde(default = "default_height")]
    pub height: u32,

    /// Синтетический ландшафт
    #[serde(default)]
    pub synthetic: SyntheticSettings,

    /// Параметры вывода цивилизации
    #[serde(default)]
    pub civilization: CivilizationSettings,
}

fn default_width() -> u32 {
    160
}
fn default_height() -> u32 {
    120
}

impl WorldCivParams {
    /// Загружает параметры из TOML-файла
    ///
    /// # Ошибки
    /// Возвращает ошибку, если файл не найден, содержит недопустимый формат
    /// или несогласованные значения.
    ///
    /// # Пример
    /// ```toml
    /// # world.toml
    /// seed = 42
    /// width = 200
    /// height = 140
    ///
    /// [civilization.nations]
    /// num_nations = 4
    /// ```
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let params: Self = toml::from_str(contents)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CivGenError::InvalidConfig(
                "width and height must be positive".to_string(),
            ));
        }
        self.civilization.validate()
    }
}

impl Default for WorldCivParams {
    fn default() -> Self {
        Self {
            seed: 0,
            width: 160,
            height: 120,
            synthetic: SyntheticSettings::default(),
            civilization: CivilizationSettings::default(),
        }
    }
}

//! Гексагональная сетка континента — единая арена узлов.
//!
//! Все перекрёстные ссылки (соседи, родитель, корень территории) — индексы
//! `row * width + col` в этой арене, а не указатели.

pub mod hex;

pub use hex::HexCoord;

use serde::{Deserialize, Serialize};

use crate::error::{CivGenError, Result};

/// Идентификатор нации; `0` — «нет притязаний» (фронтир).
pub type NationId = u32;

pub const NO_NATION: NationId = 0;

/// Ранг поселения. Порядок вариантов задаёт строгий полный порядок иерархии.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SettlementTier {
    #[default]
    None,
    Village,
    Town,
    Street,
    RegionalCapital,
    City,
    Capital,
}

impl SettlementTier {
    #[must_use]
    pub fn is_settlement(self) -> bool {
        self != SettlementTier::None
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            SettlementTier::None => "none",
            SettlementTier::Village => "village",
            SettlementTier::Town => "town",
            SettlementTier::Street => "street",
            SettlementTier::RegionalCapital => "regional capital",
            SettlementTier::City => "city",
            SettlementTier::Capital => "capital",
        }
    }
}

/// Растительность узла (влияет на стоимость прокладки дорог).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vegetation {
    #[default]
    Barren,
    Grassland,
    Forest,
    Jungle,
}

/// Неизменяемые атрибуты рельефа, которые поставляет генератор ландшафта.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Terrain {
    /// Высота 0.0..1.0
    pub elevation: f32,
    pub is_water: bool,
    pub vegetation: Vegetation,
    /// Речной сток 0.0..1.0
    pub flow: f32,
}

impl Terrain {
    #[must_use]
    pub fn land(elevation: f32) -> Self {
        Self {
            elevation,
            is_water: false,
            vegetation: Vegetation::Grassland,
            flow: 0.0,
        }
    }

    #[must_use]
    pub fn water() -> Self {
        Self {
            elevation: 0.0,
            is_water: true,
            vegetation: Vegetation::Barren,
            flow: 0.0,
        }
    }

    #[must_use]
    pub fn with_vegetation(mut self, vegetation: Vegetation) -> Self {
        self.vegetation = vegetation;
        self
    }
}

/// Узел сетки: рельеф + результаты вывода цивилизации.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridNode {
    pub coord: HexCoord,
    pub elevation: f32,
    pub is_water: bool,
    pub vegetation: Vegetation,
    pub flow: f32,

    pub settlement_tier: SettlementTier,
    pub population: u32,
    pub nation_id: NationId,
    /// Ближайшее вышестоящее поселение (ключ поиска, не владение)
    pub parent_hex_id: Option<usize>,
    /// Корневой хаб, к которому сводится владение узлом
    pub territory_id: Option<usize>,
    /// До шести соседей, на краях карты меньше
    pub neighbors: Vec<usize>,
}

impl GridNode {
    #[must_use]
    pub fn new(coord: HexCoord, terrain: Terrain) -> Self {
        Self {
            coord,
            elevation: terrain.elevation,
            is_water: terrain.is_water,
            vegetation: terrain.vegetation,
            flow: terrain.flow,
            settlement_tier: SettlementTier::None,
            population: 0,
            nation_id: NO_NATION,
            parent_hex_id: None,
            territory_id: None,
            neighbors: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_settlement(&self) -> bool {
        self.settlement_tier.is_settlement()
    }
}

#[derive(Debug, Clone)]
pub struct Grid {
    width: u32,
    height: u32,
    nodes: Vec<GridNode>,
}

impl Grid {
    /// Строит сетку по функции рельефа и вычисляет списки соседей.
    pub fn from_terrain(
        width: u32,
        height: u32,
        mut terrain: impl FnMut(HexCoord) -> Terrain,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CivGenError::EmptyGrid);
        }

        let mut nodes = Vec::with_capacity((width * height) as usize);
        for row in 0..height {
            for col in 0..width {
                let coord = HexCoord::new(col, row);
                let mut node = GridNode::new(coord, terrain(coord));
                node.neighbors = coord
                    .neighbors(width, height)
                    .map(|n| (n.row * width + n.col) as usize)
                    .collect();
                nodes.push(node);
            }
        }

        Ok(Self {
            width,
            height,
            nodes,
        })
    }

    /// Принимает готовый массив узлов от внешнего генератора.
    ///
    /// Индекс в массиве — единственный источник истины о положении узла:
    /// `coord` перезаписывается, а ссылки за пределами сетки отбрасываются.
    pub fn from_nodes(width: u32, height: u32, mut nodes: Vec<GridNode>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CivGenError::EmptyGrid);
        }
        let expected = (width as usize) * (height as usize);
        if nodes.len() != expected {
            return Err(CivGenError::GridSizeMismatch {
                expected,
                actual: nodes.len(),
            });
        }

        let mut dropped = 0usize;
        for (idx, node) in nodes.iter_mut().enumerate() {
            let (col, row) = (idx % width as usize, idx / width as usize);
            node.coord = HexCoord::new(col as u32, row as u32);

            let before = node.neighbors.len();
            node.neighbors.retain(|&n| n < expected && n != idx);
            node.neighbors.dedup();
            dropped += before - node.neighbors.len();

            if node.parent_hex_id.is_some_and(|p| p >= expected) {
                node.parent_hex_id = None;
                dropped += 1;
            }
            if node.territory_id.is_some_and(|t| t >= expected) {
                node.territory_id = None;
                dropped += 1;
            }
        }
        if dropped > 0 {
            tracing::warn!("Отброшено {} ссылок за пределами сетки", dropped);
        }

        Ok(Self {
            width,
            height,
            nodes,
        })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn nodes(&self) -> &[GridNode] {
        &self.nodes
    }

    #[must_use]
    pub fn node(&self, idx: usize) -> Option<&GridNode> {
        self.nodes.get(idx)
    }

    pub fn node_mut(&mut self, idx: usize) -> Option<&mut GridNode> {
        self.nodes.get_mut(idx)
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [GridNode] {
        &mut self.nodes
    }

    #[must_use]
    pub fn index_of(&self, coord: HexCoord) -> Option<usize> {
        if coord.col < self.width && coord.row < self.height {
            Some((coord.row * self.width + coord.col) as usize)
        } else {
            None
        }
    }

    /// Соседи узла; для индекса вне сетки — пустой срез.
    #[must_use]
    pub fn neighbors(&self, idx: usize) -> &[usize] {
        self.nodes.get(idx).map_or(&[], |n| n.neighbors.as_slice())
    }

    #[must_use]
    pub fn distance(&self, a: usize, b: usize) -> u32 {
        match (self.nodes.get(a), self.nodes.get(b)) {
            (Some(a), Some(b)) => a.coord.distance(b.coord),
            _ => u32::MAX,
        }
    }

    /// Индексы всех узлов в радиусе `radius` гексов (включая сам узел).
    #[must_use]
    pub fn within(&self, idx: usize, radius: u32) -> Vec<usize> {
        let Some(node) = self.nodes.get(idx) else {
            return Vec::new();
        };
        node.coord
            .within(radius, self.width, self.height)
            .filter_map(|c| self.index_of(c))
            .collect()
    }

    /// Суша, граничащая с водой.
    #[must_use]
    pub fn is_coastal(&self, idx: usize) -> bool {
        self.nodes.get(idx).is_some_and(|n| {
            !n.is_water
                && n
                    .neighbors
                    .iter()
                    .any(|&nb| self.nodes.get(nb).is_some_and(|m| m.is_water))
        })
    }

    /// Индексы всех поселений в порядке возрастания.
    pub fn settlements(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_settlement())
            .map(|(i, _)| i)
    }

    /// Размещает поселение (используется генератором ландшафта и тестами).
    /// Вода поселений не принимает.
    pub fn place_settlement(
        &mut self,
        coord: HexCoord,
        tier: SettlementTier,
        population: u32,
    ) -> Option<usize> {
        let idx = self.index_of(coord)?;
        let node = &mut self.nodes[idx];
        if node.is_water {
            return None;
        }
        node.settlement_tier = tier;
        node.population = population;
        Some(idx)
    }
}

impl std::ops::Index<usize> for Grid {
    type Output = GridNode;

    fn index(&self, idx: usize) -> &GridNode {
        &self.nodes[idx]
    }
}

impl std::ops::IndexMut<usize> for Grid {
    fn index_mut(&mut self, idx: usize) -> &mut GridNode {
        &mut self.nodes[idx]
    }
}

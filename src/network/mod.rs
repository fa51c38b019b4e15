//! Дорожная сеть: магистрали, подъездные дороги и морские пути.

pub mod feeder;
pub mod sea;
pub mod trunk;

pub use feeder::find_path_to_existing_network;
pub use sea::link_sea_routes;
pub use trunk::{TrunkNetwork, build_trunk_network};

use serde::{Deserialize, Serialize};

use crate::grid::{Grid, HexCoord, NO_NATION, NationId};

/// Класс дороги. Порядок вариантов: морской путь < … < магистраль.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoadLevel {
    SeaRoute,
    VillageRoad,
    TownRoad,
    Highway,
    Trunk,
}

/// Участок дороги: упорядоченный путь от поселения `from` к поселению `to`.
///
/// Подъездная дорога может заканчиваться на узле уже существующей сети —
/// тогда последний гекс пути не совпадает с `to`, но `to` всё равно остаётся
/// хабом, к которому привязано поселение.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadSegment {
    pub path: Vec<HexCoord>,
    pub level: RoadLevel,
    pub nation_id: NationId,
    pub from: usize,
    pub to: usize,
    pub cost: f64,
}

impl RoadSegment {
    #[must_use]
    pub fn new(
        grid: &Grid,
        path: &[usize],
        level: RoadLevel,
        nation_id: NationId,
        (from, to): (usize, usize),
        cost: f64,
    ) -> Self {
        Self {
            path: path.iter().map(|&idx| grid[idx].coord).collect(),
            level,
            nation_id,
            from,
            to,
            cost,
        }
    }
}

/// Общий выходной список дорог и поузловой индекс «какие дороги здесь лежат».
///
/// На узел хранится по одной записи на нацию-владельца с высшим классом её
/// дорог в этом узле, поэтому пересечение чужой дорогой не отнимает у нации
/// возможность примкнуть к своей.
#[derive(Debug, Clone)]
pub struct RoadNetwork {
    segments: Vec<RoadSegment>,
    entries: Vec<Vec<(RoadLevel, NationId)>>,
}

impl RoadNetwork {
    #[must_use]
    pub fn new(node_count: usize) -> Self {
        Self {
            segments: Vec::new(),
            entries: vec![Vec::new(); node_count],
        }
    }

    /// Добавляет участок и отмечает его гексы. Участки после добавления не меняются.
    pub fn push(&mut self, grid: &Grid, segment: RoadSegment) {
        for &coord in &segment.path {
            let Some(entries) = grid.index_of(coord).and_then(|idx| self.entries.get_mut(idx))
            else {
                continue;
            };
            match entries.iter_mut().find(|(_, owner)| *owner == segment.nation_id) {
                Some((level, _)) => *level = (*level).max(segment.level),
                None => entries.push((segment.level, segment.nation_id)),
            }
        }
        self.segments.push(segment);
    }

    pub fn extend(&mut self, grid: &Grid, segments: impl IntoIterator<Item = RoadSegment>) {
        for segment in segments {
            self.push(grid, segment);
        }
    }

    /// Высший класс дороги, проходящей через узел.
    #[must_use]
    pub fn level_at(&self, idx: usize) -> Option<RoadLevel> {
        self.entries.get(idx)?.iter().map(|&(level, _)| level).max()
    }

    /// Можно ли примкнуть к дороге в узле: есть своя или нейтральная дорога
    /// класса не ниже `threshold`.
    #[must_use]
    pub fn joins(&self, idx: usize, nation: NationId, threshold: RoadLevel) -> bool {
        self.entries.get(idx).is_some_and(|entries| {
            entries.iter().any(|&(level, owner)| {
                level >= threshold && (owner == nation || owner == NO_NATION)
            })
        })
    }

    #[must_use]
    pub fn segments(&self) -> &[RoadSegment] {
        &self.segments
    }

    #[must_use]
    pub fn into_segments(self) -> Vec<RoadSegment> {
        self.segments
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Число участков данного класса.
    #[must_use]
    pub fn count_level(&self, level: RoadLevel) -> usize {
        self.segments.iter().filter(|s| s.level == level).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Terrain;

    fn segment(grid: &Grid, path: &[usize], level: RoadLevel, nation: NationId) -> RoadSegment {
        let ends = (path[0], path[path.len() - 1]);
        RoadSegment::new(grid, path, level, nation, ends, (path.len() - 1) as f64)
    }

    #[test]
    fn level_order_matches_hierarchy() {
        use RoadLevel::*;
        assert!(Trunk > Highway && Highway > TownRoad);
        assert!(TownRoad > VillageRoad && VillageRoad > SeaRoute);
    }

    #[test]
    fn push_marks_path_with_highest_level() {
        let grid = Grid::from_terrain(6, 1, |_| Terrain::land(0.2)).unwrap();
        let mut roads = RoadNetwork::new(grid.len());
        roads.push(&grid, segment(&grid, &[0, 1, 2], RoadLevel::TownRoad, 1));
        roads.push(&grid, segment(&grid, &[2, 3, 4], RoadLevel::Trunk, NO_NATION));

        assert_eq!(roads.level_at(1), Some(RoadLevel::TownRoad));
        assert_eq!(roads.level_at(2), Some(RoadLevel::Trunk));
        assert_eq!(roads.level_at(5), None);
        assert_eq!(roads.len(), 2);
        assert_eq!(roads.count_level(RoadLevel::Trunk), 1);
    }

    #[test]
    fn joins_respects_owner_and_threshold() {
        let grid = Grid::from_terrain(6, 1, |_| Terrain::land(0.2)).unwrap();
        let mut roads = RoadNetwork::new(grid.len());
        roads.push(&grid, segment(&grid, &[0, 1], RoadLevel::Highway, 1));
        roads.push(&grid, segment(&grid, &[3, 4], RoadLevel::Trunk, NO_NATION));

        assert!(roads.joins(1, 1, RoadLevel::TownRoad));
        assert!(!roads.joins(1, 2, RoadLevel::TownRoad));
        assert!(!roads.joins(1, 1, RoadLevel::Trunk));
        assert!(roads.joins(4, 2, RoadLevel::Highway));
        assert!(!roads.joins(5, 1, RoadLevel::VillageRoad));
    }

    #[test]
    fn neutral_trunk_stays_joinable_under_national_trunk() {
        let grid = Grid::from_terrain(6, 1, |_| Terrain::land(0.2)).unwrap();
        let mut roads = RoadNetwork::new(grid.len());
        roads.push(&grid, segment(&grid, &[0, 1, 2], RoadLevel::Trunk, NO_NATION));
        roads.push(&grid, segment(&grid, &[2, 3], RoadLevel::Trunk, 1));

        assert!(roads.joins(2, 2, RoadLevel::Trunk));
        assert!(roads.joins(2, 1, RoadLevel::Trunk));
        assert!(!roads.joins(3, 2, RoadLevel::Trunk));
    }

    #[test]
    fn foreign_highway_does_not_hide_own_town_road() {
        let grid = Grid::from_terrain(6, 1, |_| Terrain::land(0.2)).unwrap();
        let mut roads = RoadNetwork::new(grid.len());
        roads.push(&grid, segment(&grid, &[0, 1, 2], RoadLevel::TownRoad, 2));
        roads.push(&grid, segment(&grid, &[1, 4], RoadLevel::Highway, 1));

        assert!(roads.joins(1, 2, RoadLevel::TownRoad));
        assert!(!roads.joins(1, 2, RoadLevel::Highway));
        assert!(roads.joins(1, 1, RoadLevel::Highway));
        assert_eq!(roads.level_at(1), Some(RoadLevel::Highway));
    }
}

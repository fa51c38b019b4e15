use std::collections::BinaryHeap;

use super::QueueEntry;
use crate::grid::Grid;

/// Поле стоимости до ближайшего из нескольких источников.
///
/// Один проход многоисточниковой Дейкстры заменяет N одиночных запросов
/// «ближайший хаб» для всех поселений яруса сразу.
#[derive(Debug, Clone)]
pub struct CostField {
    cost: Vec<f64>,
    source_of: Vec<Option<usize>>,
    came_from: Vec<Option<usize>>,
}

impl CostField {
    /// Заливка от `sources` с ценой ребра `edge_cost(from, to)`.
    ///
    /// Узлы дороже `max_cost` не раскрываются и остаются недостигнутыми.
    /// Источники вне сетки пропускаются.
    pub fn build<C>(grid: &Grid, sources: &[usize], edge_cost: C, max_cost: f64) -> Self
    where
        C: Fn(usize, usize) -> f64,
    {
        let n = grid.len();
        let mut cost = vec![f64::INFINITY; n];
        let mut source_of: Vec<Option<usize>> = vec![None; n];
        let mut came_from: Vec<Option<usize>> = vec![None; n];
        let mut heap = BinaryHeap::new();
        let mut seq = 0u64;

        for &source in sources {
            if source >= n || source_of[source].is_some() {
                continue;
            }
            cost[source] = 0.0;
            source_of[source] = Some(source);
            heap.push(QueueEntry {
                priority: 0.0,
                cost: 0.0,
                node: source,
                seq,
            });
            seq += 1;
        }

        while let Some(entry) = heap.pop() {
            let current = entry.node;
            if entry.cost > cost[current] {
                continue;
            }
            for &next in grid.neighbors(current) {
                if next >= n {
                    continue;
                }
                let step = edge_cost(current, next);
                if !step.is_finite() || step < 0.0 {
                    continue;
                }
                let tentative = cost[current] + step;
                if tentative > max_cost || tentative >= cost[next] {
                    continue;
                }
                cost[next] = tentative;
                source_of[next] = source_of[current];
                came_from[next] = Some(current);
                heap.push(QueueEntry {
                    priority: tentative,
                    cost: tentative,
                    node: next,
                    seq,
                });
                seq += 1;
            }
        }

        Self {
            cost,
            source_of,
            came_from,
        }
    }

    /// Накопленная стоимость до ближайшего источника; `None`, если узел не достигнут.
    #[must_use]
    pub fn cost(&self, idx: usize) -> Option<f64> {
        self.cost.get(idx).copied().filter(|c| c.is_finite())
    }

    /// Ближайший источник.
    #[must_use]
    pub fn source_of(&self, idx: usize) -> Option<usize> {
        self.source_of.get(idx).copied().flatten()
    }

    /// Путь от узла до его источника (оба конца включены).
    #[must_use]
    pub fn path_to_source(&self, idx: usize) -> Option<Vec<usize>> {
        let source = self.source_of(idx)?;
        let mut path = vec![idx];
        let mut current = idx;
        while current != source {
            current = self.came_from[current]?;
            path.push(current);
        }
        Some(path)
    }

    /// Число достигнутых узлов.
    #[must_use]
    pub fn reached(&self) -> usize {
        self.source_of.iter().filter(|s| s.is_some()).count()
    }
}

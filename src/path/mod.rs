//! Поиск путей по сетке: A* с предикатом цели и многоисточниковое поле стоимости.

pub mod astar;
pub mod field;

pub use astar::{PathResult, find_path, find_path_bounded, find_route};
pub use field::CostField;

use std::cmp::Ordering;

/// Элемент очереди с приоритетом. Порядок извлечения: меньший `priority`,
/// при равенстве — более ранняя вставка (`seq`), чтобы результат не зависел
/// от внутреннего устройства кучи.
#[derive(Debug, Clone, Copy)]
pub(crate) struct QueueEntry {
    pub priority: f64,
    pub cost: f64,
    pub node: usize,
    pub seq: u64,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Обратный порядок: BinaryHeap становится min-кучей
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Восстанавливает путь по обратным ссылкам, от `start` до `end` включительно.
pub(crate) fn reconstruct(came_from: &[Option<usize>], end: usize) -> Vec<usize> {
    let mut path = vec![end];
    let mut current = end;
    while let Some(prev) = came_from[current] {
        current = prev;
        path.push(current);
    }
    path.reverse();
    path
}

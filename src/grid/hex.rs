use serde::{Deserialize, Serialize};

/// Координата гекса в схеме «odd-q»: нечётные столбцы сдвинуты вниз на полгекса.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexCoord {
    pub col: u32,
    pub row: u32,
}

/// Порядок соседей фиксирован (по часовой стрелке от северо-востока) — от него
/// зависит детерминизм поиска путей и заливки.
const EVEN_COL_OFFSETS: [(i32, i32); 6] = [(1, -1), (1, 0), (0, 1), (-1, 0), (-1, -1), (0, -1)];
const ODD_COL_OFFSETS: [(i32, i32); 6] = [(1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0), (0, -1)];

impl HexCoord {
    #[must_use]
    pub const fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }

    /// Кубические координаты `(x, y, z)`, `x + y + z = 0`.
    #[must_use]
    pub fn to_cube(self) -> (i32, i32, i32) {
        let x = self.col as i32;
        let z = self.row as i32 - (x - (x & 1)) / 2;
        (x, -x - z, z)
    }

    /// Обратное преобразование; `None` для координат левее/выше карты.
    #[must_use]
    pub fn from_cube(x: i32, z: i32) -> Option<Self> {
        let row = z + (x - (x & 1)) / 2;
        if x < 0 || row < 0 {
            return None;
        }
        Some(Self::new(x as u32, row as u32))
    }

    /// Гексагональное расстояние (число шагов между центрами).
    #[must_use]
    pub fn distance(self, other: HexCoord) -> u32 {
        let (ax, ay, az) = self.to_cube();
        let (bx, by, bz) = other.to_cube();
        (ax - bx).abs().max((ay - by).abs()).max((az - bz).abs()) as u32
    }

    /// Соседи в пределах карты `width × height` (на границе их меньше шести).
    pub fn neighbors(self, width: u32, height: u32) -> impl Iterator<Item = HexCoord> {
        let offsets = if self.col % 2 == 0 {
            &EVEN_COL_OFFSETS
        } else {
            &ODD_COL_OFFSETS
        };
        offsets.iter().filter_map(move |&(dc, dr)| {
            let col = self.col as i64 + i64::from(dc);
            let row = self.row as i64 + i64::from(dr);
            if col < 0 || row < 0 || col >= i64::from(width) || row >= i64::from(height) {
                None
            } else {
                Some(HexCoord::new(col as u32, row as u32))
            }
        })
    }

    /// Все гексы на расстоянии `<= radius` в детерминированном порядке,
    /// включая сам гекс. Координаты за пределами карты отбрасываются.
    pub fn within(self, radius: u32, width: u32, height: u32) -> impl Iterator<Item = HexCoord> {
        let (cx, _, cz) = self.to_cube();
        let r = radius as i32;
        (-r..=r).flat_map(move |dx| {
            let lo = (-r).max(-dx - r);
            let hi = r.min(-dx + r);
            (lo..=hi).filter_map(move |dz| {
                HexCoord::from_cube(cx + dx, cz + dz)
                    .filter(|c| c.col < width && c.row < height)
            })
        })
    }
}

impl std::fmt::Display for HexCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_round_trip_is_identity() {
        for col in 0..7 {
            for row in 0..7 {
                let c = HexCoord::new(col, row);
                let (x, _, z) = c.to_cube();
                assert_eq!(HexCoord::from_cube(x, z), Some(c));
            }
        }
    }

    #[test]
    fn neighbors_are_at_distance_one() {
        for &c in &[HexCoord::new(4, 4), HexCoord::new(5, 4)] {
            let ns: Vec<_> = c.neighbors(10, 10).collect();
            assert_eq!(ns.len(), 6);
            assert!(ns.iter().all(|&n| c.distance(n) == 1));
        }
    }

    #[test]
    fn corner_has_fewer_neighbors() {
        let ns: Vec<_> = HexCoord::new(0, 0).neighbors(10, 10).collect();
        assert_eq!(ns.len(), 2);
    }

    #[test]
    fn within_radius_counts_full_disc() {
        // 1 + 6 + 12 гексов для радиуса 2 вдали от краёв
        let disc: Vec<_> = HexCoord::new(6, 6).within(2, 20, 20).collect();
        assert_eq!(disc.len(), 19);
        assert!(disc.iter().all(|&h| h.distance(HexCoord::new(6, 6)) <= 2));
    }

    #[test]
    fn distance_matches_known_values() {
        assert_eq!(HexCoord::new(2, 2).distance(HexCoord::new(6, 2)), 4);
        assert_eq!(HexCoord::new(2, 2).distance(HexCoord::new(2, 9)), 7);
        assert_eq!(HexCoord::new(6, 2).distance(HexCoord::new(2, 9)), 9);
    }
}

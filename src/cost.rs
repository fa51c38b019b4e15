//! Стоимость перехода между соседними гексами.

use crate::config::CostSettings;
use crate::grid::{GridNode, NO_NATION, NationId, Vegetation};

/// Тип маршрута: сухопутный или морской.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMode {
    Land,
    Sea,
}

/// Контекст расчёта: режим и (необязательно) нация-владелец дороги.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostContext {
    pub mode: RouteMode,
    pub owner: Option<NationId>,
}

impl CostContext {
    /// Сухопутная разведка без владельца.
    pub const LAND: CostContext = CostContext {
        mode: RouteMode::Land,
        owner: None,
    };

    pub const SEA: CostContext = CostContext {
        mode: RouteMode::Sea,
        owner: None,
    };

    #[must_use]
    pub fn owned_by(owner: NationId) -> Self {
        Self {
            mode: RouteMode::Land,
            owner: Some(owner),
        }
    }
}

impl CostSettings {
    /// Стоимость направленного ребра `from → to`; `f64::INFINITY` — непроходимо.
    #[must_use]
    pub fn edge_cost(&self, from: &GridNode, to: &GridNode, context: CostContext) -> f64 {
        match context.mode {
            RouteMode::Sea => {
                if to.is_water {
                    self.sea_step_cost
                } else {
                    f64::INFINITY
                }
            }
            RouteMode::Land => {
                if to.is_water {
                    return f64::INFINITY;
                }

                let mut cost = self.base_step_cost;

                cost += match to.vegetation {
                    Vegetation::Forest => self.forest_penalty,
                    Vegetation::Jungle => self.jungle_penalty,
                    Vegetation::Barren | Vegetation::Grassland => 0.0,
                };

                cost += self.mountain_penalty(to.elevation);
                cost += self.gradient_scale * f64::from((to.elevation - from.elevation).abs());

                if to.flow >= self.river_threshold {
                    cost += self.river_crossing_penalty;
                }

                match context.owner {
                    Some(owner) if to.nation_id != NO_NATION && to.nation_id != owner => {
                        cost * self.foreign_multiplier
                    }
                    _ => cost,
                }
            }
        }
    }

    /// Степенная кривая выше порога: предгорья почти бесплатны, хребты — почти стена.
    #[must_use]
    pub fn mountain_penalty(&self, elevation: f32) -> f64 {
        if elevation <= self.mountain_threshold {
            return 0.0;
        }
        let span = f64::from(1.0 - self.mountain_threshold).max(f64::EPSILON);
        let t = (f64::from(elevation - self.mountain_threshold) / span).min(1.0);
        self.mountain_scale * t.powf(self.mountain_exponent)
    }

    /// Минимально возможная стоимость шага в данном режиме (для эвристики A*).
    #[must_use]
    pub fn min_step_cost(&self, mode: RouteMode) -> f64 {
        match mode {
            RouteMode::Land => self.base_step_cost,
            RouteMode::Sea => self.sea_step_cost,
        }
    }
}

pub mod config;
pub mod cost;
pub mod error;
pub mod export;
pub mod grid;
pub mod network;
pub mod path;
pub mod pipeline;
pub mod progress;
pub mod settlement;
pub mod synthetic;
pub mod territory;

pub use config::{CivilizationSettings, WorldCivParams};
pub use error::{CivGenError, Result};
pub use export::CivilizationExport;
pub use grid::{Grid, GridNode, HexCoord, NO_NATION, NationId, SettlementTier, Terrain, Vegetation};
pub use network::{RoadLevel, RoadNetwork, RoadSegment};
pub use pipeline::{Civilization, generate_civilization};
pub use progress::{NullReporter, Reporter, TracingReporter};
pub use synthetic::generate_world;
pub use territory::{NationSummary, summarize_nations};

pub mod config;
pub mod error;
pub mod types;

pub use config::{BattleConfig, EngineConfig, PresentationConfig};
pub use error::{Result, TacticsError};
pub use types::{TeamId, Tick, UnitId};

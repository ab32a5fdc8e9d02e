//! AI control for battle units
//!
//! Architecture: Trait + Data hybrid
//! - `AiStrategy` is the swappable decision seam
//! - `AiPersonality` holds TOML-loaded weights and difficulty
//! - `BattleView` is the read-only snapshot a strategy decides from

pub mod commander;
pub mod personality;
pub mod scoring;

pub use commander::AiCommander;
pub use personality::{load_personality, AiPersonality};

use crate::battle::formulas::Formulas;
use crate::battle::units::Unit;
use crate::core::types::UnitId;
use crate::grid::hex::HexCoord;
use crate::grid::hex_grid::HexGrid;
use crate::grid::reachable::Reachable;

/// Read-only battle state handed to a strategy
pub struct BattleView<'a> {
    pub grid: &'a HexGrid,
    pub units: &'a [Unit],
    pub formulas: &'a dyn Formulas,
    /// Cells the acting unit may still move to this turn
    pub reachable: &'a Reachable,
    pub round: u32,
    /// Undefined cells count as walls for movement
    pub confine_to_map: bool,
}

impl<'a> BattleView<'a> {
    pub fn unit(&self, id: UnitId) -> Option<&'a Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Living unit standing on `hex`
    pub fn occupant(&self, hex: HexCoord) -> Option<&'a Unit> {
        self.units.iter().find(|u| u.is_alive() && u.position == hex)
    }

    /// Would `mover` be stopped from entering `hex`?
    pub fn is_blocked(&self, mover: UnitId, hex: HexCoord) -> bool {
        (self.confine_to_map && !self.grid.is_defined(hex))
            || self.occupant(hex).map(|u| u.id != mover).unwrap_or(false)
    }
}

/// Use skill `skill` (slot index) on cell `target`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiAction {
    pub skill: usize,
    pub target: HexCoord,
}

/// A full turn: optional move, then optional skill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AiDecision {
    pub destination: Option<HexCoord>,
    pub action: Option<AiAction>,
}

impl AiDecision {
    /// Do nothing and end the turn
    pub fn hold() -> Self {
        Self::default()
    }
}

/// Decides the turn of an AI-controlled unit. Invalid parts of a decision
/// are dropped by the battle system, so a strategy never has to be exact.
pub trait AiStrategy {
    fn decide(&mut self, view: &BattleView<'_>, actor: UnitId) -> AiDecision;
}

impl<F> AiStrategy for F
where
    F: FnMut(&BattleView<'_>, UnitId) -> AiDecision,
{
    fn decide(&mut self, view: &BattleView<'_>, actor: UnitId) -> AiDecision {
        self(view, actor)
    }
}

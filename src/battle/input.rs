//! Player input commands
//!
//! Each command is its own struct so hosts can build them directly; the
//! `BattleInput` enum is what `BattleSystem::handle_input` consumes.

use derive_more::From;
use serde::{Deserialize, Serialize};

use crate::grid::hex::HexCoord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectSkill {
    pub slot: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelSkill;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmTarget {
    pub target: HexCoord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveTo {
    pub destination: HexCoord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndTurn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Surrender;

/// Cursor over a cell, or off the map. Presentation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hover {
    pub cell: Option<HexCoord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, From, Serialize, Deserialize)]
pub enum BattleInput {
    SelectSkill(SelectSkill),
    CancelSkill(CancelSkill),
    ConfirmTarget(ConfirmTarget),
    MoveTo(MoveTo),
    EndTurn(EndTurn),
    Surrender(Surrender),
    Hover(Hover),
}

impl BattleInput {
    /// Accepted even while a turn is processing
    pub fn bypasses_lock(&self) -> bool {
        matches!(self, BattleInput::Hover(_) | BattleInput::Surrender(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_command() {
        let input: BattleInput = MoveTo { destination: HexCoord::new(1, 2) }.into();
        assert_eq!(input, BattleInput::MoveTo(MoveTo { destination: HexCoord::new(1, 2) }));
        assert!(!input.bypasses_lock());
        assert!(BattleInput::from(Surrender).bypasses_lock());
        assert!(BattleInput::from(Hover { cell: None }).bypasses_lock());
    }
}

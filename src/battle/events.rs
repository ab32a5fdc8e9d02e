//! Battle event log
//!
//! Every observable change pushes one entry. The presentation layer drains
//! the log once per frame.

use serde::{Deserialize, Serialize};

use crate::battle::status::StatusKind;
use crate::core::types::{Tick, UnitId};
use crate::grid::hex::HexCoord;

/// Log entry for battle events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleEvent {
    pub tick: Tick,
    pub round: u32,
    pub event_type: BattleEventType,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEventType {
    RoundStarted,
    TurnStarted { unit_id: UnitId },
    TurnSkipped { unit_id: UnitId },
    UnitMoved { unit_id: UnitId, path: Vec<HexCoord> },
    SkillUsed { unit_id: UnitId, skill: String, target: HexCoord, affected: Vec<UnitId> },
    UnitDamaged { unit_id: UnitId, amount: i32, source: HexCoord },
    UnitHealed { unit_id: UnitId, amount: i32 },
    StatusApplied { unit_id: UnitId, kind: StatusKind, duration: u32 },
    StatusExpired { unit_id: UnitId, kind: StatusKind },
    UnitDied { unit_id: UnitId },
    ProjectileSpawned { origin: HexCoord, destination: HexCoord },
    SpawnSkipped { entry: String },
    BattleEnded { victory: bool, surrender: bool },
}

/// Ordered log of events since the last drain
#[derive(Debug, Clone, Default)]
pub struct BattleEventLog {
    pub events: Vec<BattleEvent>,
}

impl BattleEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event_type: BattleEventType, description: String, tick: Tick, round: u32) {
        self.events.push(BattleEvent {
            tick,
            round,
            event_type,
            description,
        });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }
}

//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Unique identifier for units within one encounter.
///
/// Assigned sequentially at construction (party first, then enemies), so two
/// encounters built from the same inputs hand out the same ids.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    derive_more::Display,
)]
#[display(fmt = "unit#{}", _0)]
pub struct UnitId(pub u32);

/// Team identifier. Team 0 is the player side.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    derive_more::Display,
)]
#[display(fmt = "team{}", _0)]
pub struct TeamId(pub u8);

impl TeamId {
    pub const PLAYER: TeamId = TeamId(0);
    pub const ENEMY: TeamId = TeamId(1);

    pub fn is_player(&self) -> bool {
        *self == Self::PLAYER
    }

    /// Player side versus everyone else
    pub fn is_hostile_to(&self, other: TeamId) -> bool {
        self.is_player() != other.is_player()
    }
}

/// Fixed simulation step counter
pub type Tick = u64;

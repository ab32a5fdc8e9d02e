//! Status effects and their per-turn bookkeeping

use serde::{Deserialize, Serialize};

use crate::battle::constants::{MIN_STATUS_TICK, POISON_FRACTION_OF_MAX_HP, REGEN_FRACTION_OF_MAX_HP};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Poison, // Damage at turn start
    Regen,  // Healing at turn start
    Stun,   // Skips the next turn
    Haste,  // Speed up
    Slow,   // Speed and movement down
    Guard,  // Defense and resistance up
}

impl StatusKind {
    /// Is this something you want on an enemy rather than a friend?
    pub fn is_harmful(&self) -> bool {
        matches!(self, StatusKind::Poison | StatusKind::Stun | StatusKind::Slow)
    }
}

/// An active status with turns remaining
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub remaining: u32,
}

/// What a unit's statuses did at the start of its turn
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusTickReport {
    pub damage: i32,
    pub healing: i32,
    pub stunned: bool,
    pub expired: Vec<StatusKind>,
}

/// Add or refresh a status. Re-applying keeps list order and the longer duration.
pub fn apply_status(statuses: &mut Vec<StatusEffect>, kind: StatusKind, duration: u32) {
    if duration == 0 {
        return;
    }
    match statuses.iter_mut().find(|s| s.kind == kind) {
        Some(existing) => existing.remaining = existing.remaining.max(duration),
        None => statuses.push(StatusEffect {
            kind,
            remaining: duration,
        }),
    }
}

pub fn has_status(statuses: &[StatusEffect], kind: StatusKind) -> bool {
    statuses.iter().any(|s| s.kind == kind && s.remaining > 0)
}

/// Evaluate statuses at turn start, then count every duration down by one.
///
/// Amounts are reported, not applied; the caller owns HP changes so that
/// death and end-of-battle checks run through one path.
pub fn tick_statuses(statuses: &mut Vec<StatusEffect>, max_hp: i32) -> StatusTickReport {
    let mut report = StatusTickReport::default();

    for status in statuses.iter() {
        match status.kind {
            StatusKind::Poison => {
                report.damage += (max_hp / POISON_FRACTION_OF_MAX_HP).max(MIN_STATUS_TICK)
            }
            StatusKind::Regen => {
                report.healing += (max_hp / REGEN_FRACTION_OF_MAX_HP).max(MIN_STATUS_TICK)
            }
            StatusKind::Stun => report.stunned = true,
            StatusKind::Haste | StatusKind::Slow | StatusKind::Guard => {}
        }
    }

    for status in statuses.iter_mut() {
        status.remaining = status.remaining.saturating_sub(1);
    }
    statuses.retain(|s| {
        if s.remaining == 0 {
            report.expired.push(s.kind);
            false
        } else {
            true
        }
    });

    report
}

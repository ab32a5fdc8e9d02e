//! Battle system - turn-based skirmishes on a hex grid
//!
//! One unit acts at a time. Each turn it may move once and act once; using a
//! skill ends the turn. AI-controlled units decide through a pluggable
//! `AiStrategy` and act through the same validated operations as the player.

pub mod ai;
pub mod catalog;
pub mod constants;
pub mod effects;
pub mod events;
pub mod execution;
pub mod formulas;
pub mod host;
pub mod input;
pub mod projectile;
pub mod skills;
pub mod stage;
pub mod status;
pub mod targeting;
pub mod turn_order;
pub mod units;

// Re-exports for convenient access
pub use ai::{AiAction, AiCommander, AiDecision, AiPersonality, AiStrategy, BattleView};
pub use catalog::{Catalog, Chapter, UnitClass};
pub use events::{BattleEvent, BattleEventLog, BattleEventType};
pub use execution::{
    ActionState, BattleOptions, BattleOutcome, BattlePhase, BattleSetup, BattleSystem, PartyMember,
};
pub use formulas::{CombatStat, Formulas, StandardFormulas, StatKey};
pub use host::{BattleHost, BattleResult, RecordingHost};
pub use input::{BattleInput, CancelSkill, ConfirmTarget, EndTurn, Hover, MoveTo, SelectSkill, Surrender};
pub use projectile::Projectile;
pub use skills::{Affinity, EffectKind, Element, Skill, SkillEffect, TargetMode};
pub use stage::{parse_manifest_entry, EnemyEntry, Stage, StageBase};
pub use status::{StatusEffect, StatusKind};
pub use turn_order::compute_turn_order;
pub use units::{EquipmentBonus, StatBlock, StatGrowth, Unit};

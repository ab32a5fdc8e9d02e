use thiserror::Error;

use crate::core::types::UnitId;
use crate::grid::hex::HexCoord;

#[derive(Error, Debug)]
pub enum TacticsError {
    #[error("Unknown stage: chapter {chapter}, stage {stage}")]
    UnknownStage { chapter: u32, stage: u32 },

    #[error("Party is empty")]
    EmptyParty,

    #[error("Input is locked while a turn is processing")]
    InputLocked,

    #[error("Battle is already over")]
    BattleOver,

    #[error("Unit is dead: {0}")]
    UnitDead(UnitId),

    #[error("Unit not found: {0}")]
    UnitNotFound(UnitId),

    #[error("Movement already used this turn")]
    MovementSpent,

    #[error("Action already used this turn")]
    ActionSpent,

    #[error("Cell {0} is not reachable")]
    Unreachable(HexCoord),

    #[error("No skill in slot {0}")]
    UnknownSkill(usize),

    #[error("Skill '{skill}' on cooldown for {turns} more turns")]
    SkillOnCooldown { skill: String, turns: u32 },

    #[error("Not enough MP: need {need}, have {have}")]
    InsufficientMp { need: i32, have: i32 },

    #[error("Skill '{0}' has no valid target")]
    NoValidTarget(String),

    #[error("Target {0} is out of range")]
    OutOfRange(HexCoord),

    #[error("No skill is armed")]
    NoSkillArmed,

    #[error("A skill is armed; cancel it first")]
    SkillArmed,

    #[error("Unknown class: {0}")]
    UnknownClass(String),

    #[error("Invalid manifest entry '{entry}': {reason}")]
    Manifest { entry: String, reason: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TacticsError>;

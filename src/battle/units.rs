//! Unit records: the simulation side of a combatant
//!
//! Visual interpolation, shake, and knockback live in the renderer's
//! `PresentationTable`, never here.

use serde::{Deserialize, Serialize};

use crate::battle::formulas::{CombatStat, Formulas};
use crate::battle::skills::Skill;
use crate::battle::status::{self, StatusEffect, StatusKind};
use crate::core::types::{TeamId, UnitId};
use crate::grid::hex::{HexCoord, HexDirection};

/// Base attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatBlock {
    pub level: i32,
    pub strength: i32,
    pub intelligence: i32,
    pub dexterity: i32,
    pub vitality: i32,
    pub agility: i32,
}

impl Default for StatBlock {
    fn default() -> Self {
        Self {
            level: 1,
            strength: 5,
            intelligence: 5,
            dexterity: 5,
            vitality: 5,
            agility: 5,
        }
    }
}

/// Per-level attribute gains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatGrowth {
    pub strength: i32,
    pub intelligence: i32,
    pub dexterity: i32,
    pub vitality: i32,
    pub agility: i32,
}

impl StatBlock {
    /// Stats at `level`, growing linearly from a level-1 base
    pub fn at_level(base: &StatBlock, growth: &StatGrowth, level: i32) -> StatBlock {
        let gained = (level - 1).max(0);
        StatBlock {
            level: level.max(1),
            strength: base.strength + growth.strength * gained,
            intelligence: base.intelligence + growth.intelligence * gained,
            dexterity: base.dexterity + growth.dexterity * gained,
            vitality: base.vitality + growth.vitality * gained,
            agility: base.agility + growth.agility * gained,
        }
    }
}

/// Flat bonuses from equipped items, counted only when a caller asks for them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EquipmentBonus {
    pub attack: i32,
    pub magic: i32,
    pub defense: i32,
    pub resistance: i32,
    pub speed: i32,
    pub movement: i32,
}

/// A combatant on the battlefield
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub team: TeamId,
    pub name: String,
    pub class_key: String,
    pub icon: String,

    // Position
    pub position: HexCoord,
    pub facing: HexDirection,

    // Attributes
    pub stats: StatBlock,
    pub equipment: EquipmentBonus,

    // Resources
    pub hp: i32,
    pub max_hp: i32,
    pub mp: i32,
    pub max_mp: i32,

    pub statuses: Vec<StatusEffect>,
    pub skills: Vec<Skill>,
}

impl Unit {
    /// A unit with 1/1 HP and no MP; call `refresh_resources` to size its pools
    pub fn new(name: &str, class_key: &str, stats: StatBlock) -> Self {
        Self {
            id: UnitId::default(),
            team: TeamId::PLAYER,
            name: name.to_string(),
            class_key: class_key.to_string(),
            icon: String::new(),
            position: HexCoord::default(),
            facing: HexDirection::default(),
            stats,
            equipment: EquipmentBonus::default(),
            hp: 1,
            max_hp: 1,
            mp: 0,
            max_mp: 0,
            statuses: Vec::new(),
            skills: Vec::new(),
        }
    }

    pub fn with_skills(mut self, skills: Vec<Skill>) -> Self {
        self.skills = skills;
        self
    }

    pub fn on_team(mut self, team: TeamId) -> Self {
        self.team = team;
        self
    }

    /// Size HP/MP pools from derived stats and fill them
    pub fn refresh_resources(&mut self, formulas: &dyn Formulas) {
        self.max_hp = (formulas.derived_stat(self, CombatStat::MaxHp, true).round() as i32).max(1);
        self.max_mp = (formulas.derived_stat(self, CombatStat::MaxMp, true).round() as i32).max(0);
        self.hp = self.max_hp;
        self.mp = self.max_mp;
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_player_side(&self) -> bool {
        self.team.is_player()
    }

    pub fn has_status(&self, kind: StatusKind) -> bool {
        status::has_status(&self.statuses, kind)
    }

    pub fn add_status(&mut self, kind: StatusKind, duration: u32) {
        status::apply_status(&mut self.statuses, kind, duration);
    }

    /// Remove up to `amount` HP; returns what was actually lost
    pub fn lose_hp(&mut self, amount: i32) -> i32 {
        let lost = amount.clamp(0, self.hp.max(0));
        self.hp -= lost;
        lost
    }

    /// Restore up to `amount` HP; returns what was actually gained
    pub fn gain_hp(&mut self, amount: i32) -> i32 {
        let gained = amount.clamp(0, (self.max_hp - self.hp).max(0));
        self.hp += gained;
        gained
    }

    pub fn hp_fraction(&self) -> f32 {
        if self.max_hp <= 0 {
            0.0
        } else {
            self.hp as f32 / self.max_hp as f32
        }
    }

    pub fn tick_cooldowns(&mut self) {
        for skill in &mut self.skills {
            skill.tick_cooldown();
        }
    }

    /// Can the skill in `slot` be paid for and is it off cooldown?
    pub fn can_use(&self, slot: usize) -> bool {
        self.skills
            .get(slot)
            .map(|s| s.is_ready() && self.mp >= s.cost)
            .unwrap_or(false)
    }
}

//! Skill definitions: cost, cooldown, range, and targeting shape

use serde::{Deserialize, Serialize};

use crate::battle::status::StatusKind;

/// Shape of the cells a skill affects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetMode {
    /// Only the caster; the confirmed cell is ignored
    SelfOnly,
    /// Every cell on the traced line from the caster, excluding the caster's own cell
    Line,
    /// Every cell within `area_radius` of the confirmed cell
    Area,
}

/// Which units inside the shape are affected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Affinity {
    #[default]
    Foes,
    Allies,
    Everyone,
}

/// Damage scaling and mitigation pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    #[default]
    Physical, // Attack vs Defense
    Magical,  // Magic vs Resistance
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectKind {
    Damage {
        power: i32,
        #[serde(default)]
        element: Element,
    },
    Heal {
        power: i32,
    },
    Status {
        kind: StatusKind,
        duration: u32,
    },
}

impl EffectKind {
    /// Is this something you aim at enemies?
    pub fn is_harmful(&self) -> bool {
        match self {
            EffectKind::Damage { .. } => true,
            EffectKind::Heal { .. } => false,
            EffectKind::Status { kind, .. } => kind.is_harmful(),
        }
    }
}

/// Main effect: targeting shape plus what it does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillEffect {
    pub mode: TargetMode,
    #[serde(default)]
    pub area_radius: u32,
    #[serde(default)]
    pub affects: Affinity,
    pub kind: EffectKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// MP cost
    #[serde(default)]
    pub cost: i32,
    /// Turns the skill is unavailable after use
    #[serde(default)]
    pub cooldown: u32,
    #[serde(default)]
    pub cooldown_remaining: u32,
    #[serde(default)]
    pub range: u32,
    pub effect: SkillEffect,
    #[serde(default)]
    pub secondary: Option<EffectKind>,
}

impl Skill {
    fn with_effect(id: &str, range: u32, effect: SkillEffect) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            cost: 0,
            cooldown: 0,
            cooldown_remaining: 0,
            range,
            effect,
            secondary: None,
        }
    }

    pub fn self_only(id: &str, kind: EffectKind) -> Self {
        Self::with_effect(
            id,
            0,
            SkillEffect {
                mode: TargetMode::SelfOnly,
                area_radius: 0,
                affects: Affinity::Allies,
                kind,
            },
        )
    }

    pub fn line(id: &str, range: u32, kind: EffectKind) -> Self {
        Self::with_effect(
            id,
            range,
            SkillEffect {
                mode: TargetMode::Line,
                area_radius: 0,
                affects: default_affinity(&kind),
                kind,
            },
        )
    }

    pub fn area(id: &str, range: u32, radius: u32, kind: EffectKind) -> Self {
        Self::with_effect(
            id,
            range,
            SkillEffect {
                mode: TargetMode::Area,
                area_radius: radius,
                affects: default_affinity(&kind),
                kind,
            },
        )
    }

    pub fn with_cost(mut self, cost: i32) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_cooldown(mut self, cooldown: u32) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_secondary(mut self, secondary: EffectKind) -> Self {
        self.secondary = Some(secondary);
        self
    }

    pub fn affecting(mut self, affects: Affinity) -> Self {
        self.effect.affects = affects;
        self
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown_remaining == 0
    }

    /// Farthest distance at which a unit can still be caught by this skill
    pub fn reach(&self) -> u32 {
        match self.effect.mode {
            TargetMode::SelfOnly => 0,
            TargetMode::Line => self.range,
            TargetMode::Area => self.range + self.effect.area_radius,
        }
    }

    /// Start the cooldown after a committed use
    pub fn trigger_cooldown(&mut self) {
        self.cooldown_remaining = self.cooldown;
    }

    pub fn tick_cooldown(&mut self) {
        self.cooldown_remaining = self.cooldown_remaining.saturating_sub(1);
    }
}

fn default_affinity(kind: &EffectKind) -> Affinity {
    if kind.is_harmful() {
        Affinity::Foes
    } else {
        Affinity::Allies
    }
}

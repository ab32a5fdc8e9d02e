//! AI personality configuration loaded from TOML
//!
//! Personalities define behavior tendencies, action weights, range
//! preference, and difficulty.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{Result, TacticsError};

/// Behavioral tendencies (0.0 to 1.0)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Tendency to attack vs hold back (0.0 = defensive, 1.0 = aggressive)
    pub aggression: f32,
    /// Tendency to avoid risks (0.0 = reckless, 1.0 = cautious)
    pub caution: f32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            aggression: 0.5,
            caution: 0.5,
        }
    }
}

/// Weights for scoring candidate actions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    /// Per point of damage dealt to foes
    pub damage_value: f32,
    /// Flat bonus per foe the action would kill
    pub kill_bonus: f32,
    /// Per point of damage dealt to allies
    pub friendly_fire_penalty: f32,
    /// Per point of HP restored to allies
    pub healing_value: f32,
    /// Per harmful status on a foe or helpful status on an ally
    pub status_value: f32,
    /// Per MP spent
    pub mana_cost: f32,
    /// HP fraction below which a unit with nothing to do backs off
    pub retreat_threshold: f32,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            damage_value: 1.0,
            kill_bonus: 25.0,
            friendly_fire_penalty: 1.5,
            healing_value: 0.8,
            status_value: 6.0,
            mana_cost: 0.2,
            retreat_threshold: 0.25,
        }
    }
}

/// Engagement distance the AI tries to hold when it cannot act
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePreference {
    #[default]
    Close,
    Ranged,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferencesConfig {
    pub preferred_range: RangePreference,
}

/// Difficulty modifiers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    /// Chance to pick among the top three candidates instead of the best
    pub mistake_chance: f32,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self { mistake_chance: 0.1 }
    }
}

/// Complete AI personality configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiPersonality {
    /// Name of this personality (set from filename)
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub behavior: BehaviorConfig,
    #[serde(default)]
    pub weights: WeightConfig,
    #[serde(default)]
    pub preferences: PreferencesConfig,
    #[serde(default)]
    pub difficulty: DifficultyConfig,
}

impl Default for AiPersonality {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            behavior: BehaviorConfig::default(),
            weights: WeightConfig::default(),
            preferences: PreferencesConfig::default(),
            difficulty: DifficultyConfig::default(),
        }
    }
}

impl AiPersonality {
    pub fn from_toml_str(name: &str, content: &str) -> Result<Self> {
        let mut personality: AiPersonality = toml::from_str(content)?;
        personality.name = name.to_string();
        personality.validate()?;
        Ok(personality)
    }

    pub fn validate(&self) -> Result<()> {
        let unit = |v: f32| (0.0..=1.0).contains(&v);
        if !unit(self.behavior.aggression) || !unit(self.behavior.caution) {
            return Err(TacticsError::InvalidConfig(format!(
                "personality '{}': behavior values must be within 0..=1",
                self.name
            )));
        }
        if !unit(self.difficulty.mistake_chance) || !unit(self.weights.retreat_threshold) {
            return Err(TacticsError::InvalidConfig(format!(
                "personality '{}': mistake_chance and retreat_threshold must be within 0..=1",
                self.name
            )));
        }
        Ok(())
    }
}

/// Load personality from TOML file
///
/// Loads from `{dir}/{name}.toml`, typically `data/ai_personalities`
pub fn load_personality(dir: impl AsRef<Path>, name: &str) -> Result<AiPersonality> {
    let path = dir.as_ref().join(format!("{}.toml", name));
    let contents = fs::read_to_string(&path)?;
    AiPersonality::from_toml_str(name, &contents)
}

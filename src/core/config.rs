//! Engine configuration with documented constants
//!
//! All tunable pacing values are collected here. Config files are TOML and
//! every section is optional; missing values fall back to the defaults below.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{Result, TacticsError};
use crate::grid::projection::Projection;

/// Turn pacing and battlefield rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Fixed ticks the machine stays in `ProcessingTurn` after an action
    /// resolves, before control moves on.
    ///
    /// At the default 60 Hz step, 24 ticks is 0.4 s: long enough for a
    /// projectile at default speed to land. Headless runs use 0.
    pub turn_settle_ticks: u32,

    /// Treat cells the stage never defined as walls for movement.
    ///
    /// The grid itself is unbounded; this is what keeps units on the stage.
    pub confine_to_map: bool,

    /// Progress per second for spawned projectiles (1.0 = one second flight)
    pub projectile_speed: f32,

    /// Upper bound on fixed ticks `run_until_idle` will spend before giving up
    pub max_idle_ticks: u64,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            turn_settle_ticks: 24,
            confine_to_map: true,
            projectile_speed: 3.0,
            max_idle_ticks: 200_000,
        }
    }
}

impl BattleConfig {
    /// Zero-delay pacing for tests and headless runs
    pub fn headless() -> Self {
        Self {
            turn_settle_ticks: 0,
            ..Self::default()
        }
    }
}

/// Renderer-side animation pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    /// Fixed simulation/animation steps per second
    pub tick_rate_hz: f32,

    /// Fraction of shake magnitude kept per second
    ///
    /// At 0.02, a hit shake is mostly gone after a quarter second.
    pub shake_retention: f32,

    /// Fraction of knockback offset kept per second
    pub knockback_retention: f32,

    /// Shake magnitude (pixels) applied per point of damage, capped by `max_shake`
    pub shake_per_damage: f32,
    pub max_shake: f32,

    /// Knockback distance (pixels) applied on hit
    pub knockback_distance: f32,

    /// Interpolation speed of visual positions toward their cell (1/s)
    pub move_lerp_rate: f32,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60.0,
            shake_retention: 0.02,
            knockback_retention: 0.05,
            shake_per_damage: 0.4,
            max_shake: 12.0,
            knockback_distance: 8.0,
            move_lerp_rate: 12.0,
        }
    }
}

impl PresentationConfig {
    pub fn step_seconds(&self) -> f32 {
        1.0 / self.tick_rate_hz
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub battle: BattleConfig,
    pub projection: Projection,
    pub presentation: PresentationConfig,
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML config
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.presentation.tick_rate_hz <= 0.0 {
            return Err(TacticsError::InvalidConfig(format!(
                "tick_rate_hz ({}) must be positive",
                self.presentation.tick_rate_hz
            )));
        }

        if self.battle.projectile_speed <= 0.0 {
            return Err(TacticsError::InvalidConfig(
                "projectile_speed must be positive".into(),
            ));
        }

        for (name, value) in [
            ("shake_retention", self.presentation.shake_retention),
            ("knockback_retention", self.presentation.knockback_retention),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(TacticsError::InvalidConfig(format!(
                    "{name} ({value}) must be within 0..=1"
                )));
            }
        }

        if self.projection.zoom <= 0.0 || self.projection.hex_size <= 0.0 {
            return Err(TacticsError::InvalidConfig(
                "zoom and hex_size must be positive".into(),
            ));
        }

        if self.projection.tilt <= 0.0 || self.projection.tilt > 1.0 {
            return Err(TacticsError::InvalidConfig(format!(
                "tilt ({}) must be within (0, 1]",
                self.projection.tilt
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [battle]
            turn_settle_ticks = 0

            [projection]
            zoom = 2.0
            "#,
        )
        .unwrap();

        assert_eq!(config.battle.turn_settle_ticks, 0);
        assert!(config.battle.confine_to_map);
        assert_eq!(config.projection.zoom, 2.0);
        assert_eq!(config.presentation.tick_rate_hz, 60.0);
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let config = EngineConfig::load(concat!(env!("CARGO_MANIFEST_DIR"), "/data/engine.toml")).unwrap();
        let defaults = EngineConfig::default();
        assert_eq!(config.battle.turn_settle_ticks, defaults.battle.turn_settle_ticks);
        assert_eq!(config.projection, defaults.projection);
        assert_eq!(config.presentation.step_seconds(), defaults.presentation.step_seconds());
    }

    #[test]
    fn test_rejects_bad_tilt() {
        let result = EngineConfig::from_toml_str("[projection]\ntilt = 1.5\n");
        assert!(matches!(result, Err(TacticsError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let result = EngineConfig::from_toml_str("[battle\n");
        assert!(matches!(result, Err(TacticsError::TomlError(_))));
    }
}

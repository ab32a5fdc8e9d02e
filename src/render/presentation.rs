//! Renderer-owned visual state
//!
//! Shake, knockback, and eased positions live here, keyed by unit id. The
//! battle system never reads this table; it only feeds it through events.

use ahash::AHashMap;
use glam::Vec2;

use crate::battle::events::{BattleEvent, BattleEventType};
use crate::battle::projectile::Projectile;
use crate::battle::units::Unit;
use crate::core::config::PresentationConfig;
use crate::core::types::UnitId;
use crate::grid::hex_grid::HexGrid;

/// Visual hints for one unit
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UnitVisual {
    /// Eased on-screen anchor
    pub position: Vec2,
    /// Where `position` is heading: the surface of the unit's cell
    pub target: Vec2,
    /// Jitter magnitude in pixels; the renderer picks the direction
    pub shake: f32,
    /// Offset away from the last hit
    pub knockback: Vec2,
}

impl UnitVisual {
    pub fn at(anchor: Vec2) -> Self {
        Self {
            position: anchor,
            target: anchor,
            ..Self::default()
        }
    }

    pub fn draw_position(&self) -> Vec2 {
        self.position + self.knockback
    }

    pub fn is_settled(&self) -> bool {
        self.shake < 0.01 && self.knockback.length_squared() < 1e-4 && self.position.distance_squared(self.target) < 1e-4
    }
}

#[derive(Debug, Clone, Default)]
pub struct PresentationTable {
    visuals: AHashMap<UnitId, UnitVisual>,
    config: PresentationConfig,
}

impl PresentationTable {
    pub fn new(config: PresentationConfig) -> Self {
        Self {
            visuals: AHashMap::new(),
            config,
        }
    }

    /// Add entries for units not seen yet, placed on their cells
    pub fn sync(&mut self, units: &[Unit], grid: &HexGrid) {
        for unit in units {
            self.visuals
                .entry(unit.id)
                .or_insert_with(|| UnitVisual::at(grid.surface_pixel(unit.position)));
        }
    }

    pub fn get(&self, id: UnitId) -> Option<&UnitVisual> {
        self.visuals.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UnitId, &UnitVisual)> {
        self.visuals.iter()
    }

    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }

    /// Fold a batch of battle events into visual state
    pub fn absorb(&mut self, events: &[BattleEvent], grid: &HexGrid) {
        for event in events {
            match &event.event_type {
                BattleEventType::UnitMoved { unit_id, path } => {
                    let Some(last) = path.last() else { continue };
                    let anchor = grid.surface_pixel(*last);
                    let from = path.first().map(|c| grid.surface_pixel(*c)).unwrap_or(anchor);
                    let visual = self.visuals.entry(*unit_id).or_insert_with(|| UnitVisual::at(from));
                    visual.target = anchor;
                }
                BattleEventType::UnitDamaged { unit_id, amount, source } => {
                    let Some(visual) = self.visuals.get_mut(unit_id) else { continue };
                    visual.shake = (visual.shake + *amount as f32 * self.config.shake_per_damage)
                        .min(self.config.max_shake);
                    let away = (visual.target - grid.surface_pixel(*source)).normalize_or_zero();
                    visual.knockback = away * self.config.knockback_distance;
                }
                _ => {}
            }
        }
    }

    /// Decay shake and knockback, ease positions toward their targets
    pub fn step(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        let shake_keep = self.config.shake_retention.powf(dt);
        let knock_keep = self.config.knockback_retention.powf(dt);
        let ease = 1.0 - (-self.config.move_lerp_rate * dt).exp();
        for visual in self.visuals.values_mut() {
            visual.shake *= shake_keep;
            visual.knockback *= knock_keep;
            visual.position = visual.position.lerp(visual.target, ease);
        }
    }
}

/// Advance projectiles by `dt` seconds and drop the ones that landed.
/// Returns how many were retired.
pub fn retire_projectiles(projectiles: &mut Vec<Projectile>, dt: f32) -> usize {
    let before = projectiles.len();
    projectiles.retain_mut(|p| !p.advance(dt));
    before - projectiles.len()
}

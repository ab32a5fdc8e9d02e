//! Ranged skill projectiles
//!
//! The battle system spawns them; only the presentation layer advances and
//! retires them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::grid::hex::HexCoord;
use crate::grid::hex_grid::HexGrid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub origin: HexCoord,
    pub destination: HexCoord,
    /// 0.0 at launch, 1.0 on arrival
    pub progress: f32,
    /// Progress per second
    pub speed: f32,
}

impl Projectile {
    pub fn new(origin: HexCoord, destination: HexCoord, speed: f32) -> Self {
        Self {
            origin,
            destination,
            progress: 0.0,
            speed,
        }
    }

    /// Advance by `dt` seconds. Returns true once the projectile has landed.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.progress = (self.progress + self.speed * dt.max(0.0)).min(1.0);
        self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.progress >= 1.0
    }

    /// Screen position along the flight, lerped between the two surfaces
    pub fn position(&self, grid: &HexGrid) -> Vec2 {
        let from = grid.surface_pixel(self.origin);
        let to = grid.surface_pixel(self.destination);
        from.lerp(to, self.progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_clamps() {
        let mut p = Projectile::new(HexCoord::new(0, 0), HexCoord::new(3, 0), 2.0);
        assert!(!p.advance(0.25));
        assert!((p.progress - 0.5).abs() < 1e-6);
        assert!(p.advance(10.0));
        assert_eq!(p.progress, 1.0);
    }

    #[test]
    fn test_position_endpoints() {
        let grid = HexGrid::new();
        let mut p = Projectile::new(HexCoord::new(0, 0), HexCoord::new(2, 0), 1.0);
        assert_eq!(p.position(&grid), grid.surface_pixel(HexCoord::new(0, 0)));
        p.advance(1.0);
        assert!((p.position(&grid) - grid.surface_pixel(HexCoord::new(2, 0))).length() < 1e-3);
    }
}

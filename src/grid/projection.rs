//! Projection from hex coordinates to screen space.
//!
//! Pointy-top hexagons, squashed vertically by `tilt` to fake a camera pitch,
//! with terrain height lifting cells up the screen.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::grid::hex::HexCoord;

const SQRT_3: f32 = 1.732_050_8;

/// Zoom and tilt parameters shared by the grid and the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Projection {
    /// Distance from hex center to corner at zoom 1.0 (pixels)
    pub hex_size: f32,
    /// Uniform scale
    pub zoom: f32,
    /// Vertical squash (1.0 = top-down, smaller = flatter)
    pub tilt: f32,
    /// Pixels per terrain height unit at zoom 1.0
    pub height_scale: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            hex_size: 32.0,
            zoom: 1.0,
            tilt: 0.6,
            height_scale: 8.0,
        }
    }
}

impl Projection {
    /// Screen position of a hex center raised by `height_units`
    pub fn hex_to_pixel_3d(&self, hex: HexCoord, height_units: f32) -> Vec2 {
        let size = self.hex_size * self.zoom;
        let x = size * (SQRT_3 * hex.q as f32 + SQRT_3 / 2.0 * hex.r as f32);
        let y = size * (1.5 * hex.r as f32) * self.tilt;
        Vec2::new(x, y - height_units * self.height_scale * self.zoom)
    }

    /// Ground-plane inverse of `hex_to_pixel_3d` (height 0)
    pub fn pixel_to_hex(&self, point: Vec2) -> HexCoord {
        let size = self.hex_size * self.zoom;
        let y = point.y / self.tilt;
        let q = (SQRT_3 / 3.0 * point.x - y / 3.0) / size;
        let r = (2.0 / 3.0 * y) / size;
        HexCoord::round(q as f64, r as f64)
    }
}

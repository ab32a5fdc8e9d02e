//! The battlefield grid: terrain storage, geometry, and projection
//!
//! Coordinates are unbounded. Cells never set read back as open plain, and
//! only the stage data decides which cells are part of the battlefield.

use ahash::AHashMap;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::grid::hex::HexCoord;
use crate::grid::projection::Projection;
use crate::grid::reachable::{self, Reachable};
use crate::grid::terrain::TerrainType;

/// The full hex grid
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HexGrid {
    cells: AHashMap<HexCoord, TerrainType>,
    projection: Projection,
}

impl HexGrid {
    /// Create an empty grid (every cell reads as plain)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_projection(projection: Projection) -> Self {
        Self {
            cells: AHashMap::new(),
            projection,
        }
    }

    /// Fill a closed disk around `center` with one terrain type
    pub fn filled(center: HexCoord, radius: u32, terrain: TerrainType) -> Self {
        let mut grid = Self::new();
        for hex in center.hexes_in_range(radius) {
            grid.set_terrain(hex, terrain);
        }
        grid
    }

    /// Overwrite a cell's terrain; no bounds checking
    pub fn set_terrain(&mut self, hex: HexCoord, terrain: TerrainType) {
        self.cells.insert(hex, terrain);
    }

    /// Stored terrain, or the default open type
    pub fn terrain(&self, hex: HexCoord) -> TerrainType {
        self.cells.get(&hex).copied().unwrap_or_default()
    }

    /// Whether the stage ever set this cell
    pub fn is_defined(&self, hex: HexCoord) -> bool {
        self.cells.contains_key(&hex)
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn distance(&self, a: HexCoord, b: HexCoord) -> u32 {
        a.distance(&b)
    }

    /// Straight line from `a` toward `b`, clipped to `max_range` steps
    pub fn line(&self, a: HexCoord, b: HexCoord, max_range: u32) -> Vec<HexCoord> {
        a.line_to(&b, max_range)
    }

    pub fn neighbors(&self, hex: HexCoord) -> [HexCoord; 6] {
        hex.neighbors()
    }

    /// Every cell reachable from `origin` within `budget` movement points,
    /// honoring terrain cost and `is_blocked`
    pub fn reachable_set<F>(&self, origin: HexCoord, budget: u32, is_blocked: F) -> Reachable
    where
        F: Fn(HexCoord) -> bool,
    {
        reachable::reachable_set(
            origin,
            budget,
            |hex| self.terrain(hex).movement_cost(),
            is_blocked,
        )
    }

    /// Cheapest path from `start` to `goal`, giving up past `max_cost`
    pub fn find_path<F>(
        &self,
        start: HexCoord,
        goal: HexCoord,
        max_cost: u32,
        is_blocked: F,
    ) -> Option<Vec<HexCoord>>
    where
        F: Fn(HexCoord) -> bool,
    {
        reachable::find_path(
            start,
            goal,
            max_cost,
            |hex| self.terrain(hex).movement_cost(),
            is_blocked,
        )
    }

    /// Defined cells in back-to-front painter order
    pub fn sorted_hexes(&self) -> Vec<(HexCoord, TerrainType)> {
        let mut hexes: Vec<(HexCoord, TerrainType)> =
            self.cells.iter().map(|(hex, terrain)| (*hex, *terrain)).collect();
        hexes.sort_by_key(|(hex, _)| (hex.r, hex.q));
        hexes
    }

    /// Screen position of a cell raised by `height_units`
    pub fn hex_to_pixel_3d(&self, hex: HexCoord, height_units: f32) -> Vec2 {
        self.projection.hex_to_pixel_3d(hex, height_units)
    }

    /// Screen position of a cell's surface (terrain height included)
    pub fn surface_pixel(&self, hex: HexCoord) -> Vec2 {
        self.hex_to_pixel_3d(hex, self.terrain(hex).height_units())
    }

    /// Ground-plane pick for input handling
    pub fn pixel_to_hex(&self, point: Vec2) -> HexCoord {
        self.projection.pixel_to_hex(point)
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Zoom and tilt are presentation state; changing them never touches terrain
    pub fn projection_mut(&mut self) -> &mut Projection {
        &mut self.projection
    }
}

//! Hex coordinate system for the battlefield (axial coordinates)
//!
//! Uses axial coordinates (q, r); the cube coordinate s is derived.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Nudge applied to both line endpoints before rounding.
///
/// Lines that pass exactly between two cells always resolve to the same side,
/// so the highlighted corridor and the resolved corridor never disagree.
const LINE_NUDGE_Q: f64 = 1e-6;
const LINE_NUDGE_R: f64 = 2e-6;

/// Axial hex coordinate
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    derive_more::Display,
)]
#[display(fmt = "({}, {})", q, r)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl HexCoord {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Cube coordinate S (derived from q and r)
    pub fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Hex-step distance
    pub fn distance(&self, other: &Self) -> u32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        ((dq + dr + ds) / 2) as u32
    }

    /// Get all 6 neighboring hex coordinates, in `HexDirection::all()` order
    pub fn neighbors(&self) -> [HexCoord; 6] {
        HexDirection::all().map(|dir| self.step(dir))
    }

    /// The adjacent cell in `dir`
    pub fn step(&self, dir: HexDirection) -> HexCoord {
        let offset = dir.offset();
        HexCoord::new(self.q + offset.q, self.r + offset.r)
    }

    /// Cells on the straight line from self toward `other`, starting with self.
    ///
    /// The trace stops after `max_range` steps even when `other` lies further
    /// away, so the result has `min(distance, max_range) + 1` cells and every
    /// cell lies within `max_range` of self.
    pub fn line_to(&self, other: &Self, max_range: u32) -> Vec<HexCoord> {
        let n = self.distance(other);
        if n == 0 {
            return vec![*self];
        }

        let steps = n.min(max_range);
        let (aq, ar) = (self.q as f64 + LINE_NUDGE_Q, self.r as f64 + LINE_NUDGE_R);
        let (bq, br) = (other.q as f64 + LINE_NUDGE_Q, other.r as f64 + LINE_NUDGE_R);

        let mut results = Vec::with_capacity(steps as usize + 1);
        for i in 0..=steps {
            let t = i as f64 / n as f64;
            results.push(Self::round(aq + (bq - aq) * t, ar + (br - ar) * t));
        }
        results
    }

    /// Round fractional axial coordinates to the nearest hex
    pub fn round(q: f64, r: f64) -> Self {
        let s = -q - r;
        let mut rq = q.round();
        let mut rr = r.round();
        let rs = s.round();

        let q_diff = (rq - q).abs();
        let r_diff = (rr - r).abs();
        let s_diff = (rs - s).abs();

        if q_diff > r_diff && q_diff > s_diff {
            rq = -rr - rs;
        } else if r_diff > s_diff {
            rr = -rq - rs;
        }

        Self::new(rq as i32, rr as i32)
    }

    /// Get all hexes within range (inclusive), the closed disk around self
    pub fn hexes_in_range(&self, range: u32) -> Vec<HexCoord> {
        let range = range as i32;
        let mut results = Vec::new();
        for q in -range..=range {
            for r in (-range).max(-q - range)..=range.min(-q + range) {
                results.push(HexCoord::new(self.q + q, self.r + r));
            }
        }
        results
    }

    /// Which side of self faces `target` most directly
    pub fn direction_to(&self, target: &Self) -> HexDirection {
        HexDirection::all()
            .into_iter()
            .min_by_key(|dir| self.step(*dir).distance(target))
            .unwrap_or_default()
    }
}

/// Parses the stage-data form `"q,r"`
impl FromStr for HexCoord {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (q, r) = s
            .split_once(',')
            .ok_or_else(|| format!("expected 'q,r', got '{s}'"))?;
        let q = q
            .trim()
            .parse::<i32>()
            .map_err(|e| format!("bad q in '{s}': {e}"))?;
        let r = r
            .trim()
            .parse::<i32>()
            .map_err(|e| format!("bad r in '{s}': {e}"))?;
        Ok(HexCoord::new(q, r))
    }
}

/// Direction enum for hex facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HexDirection {
    #[default]
    East,
    NorthEast,
    NorthWest,
    West,
    SouthWest,
    SouthEast,
}

impl HexDirection {
    /// Get the hex offset for this direction
    pub fn offset(&self) -> HexCoord {
        match self {
            HexDirection::East => HexCoord::new(1, 0),
            HexDirection::NorthEast => HexCoord::new(1, -1),
            HexDirection::NorthWest => HexCoord::new(0, -1),
            HexDirection::West => HexCoord::new(-1, 0),
            HexDirection::SouthWest => HexCoord::new(-1, 1),
            HexDirection::SouthEast => HexCoord::new(0, 1),
        }
    }

    /// Get opposite direction
    pub fn opposite(&self) -> Self {
        match self {
            HexDirection::East => HexDirection::West,
            HexDirection::NorthEast => HexDirection::SouthWest,
            HexDirection::NorthWest => HexDirection::SouthEast,
            HexDirection::West => HexDirection::East,
            HexDirection::SouthWest => HexDirection::NorthEast,
            HexDirection::SouthEast => HexDirection::NorthWest,
        }
    }

    /// All directions
    pub fn all() -> [HexDirection; 6] {
        [
            HexDirection::East,
            HexDirection::NorthEast,
            HexDirection::NorthWest,
            HexDirection::West,
            HexDirection::SouthWest,
            HexDirection::SouthEast,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_distance_same() {
        let a = HexCoord::new(3, -2);
        assert_eq!(a.distance(&a), 0);
    }

    #[test]
    fn test_hex_distance_adjacent() {
        let a = HexCoord::new(0, 0);
        for n in a.neighbors() {
            assert_eq!(a.distance(&n), 1);
        }
    }

    #[test]
    fn test_hex_distance_diagonal() {
        let a = HexCoord::new(0, 0);
        let b = HexCoord::new(2, -1);
        assert_eq!(a.distance(&b), 2);
        assert_eq!(b.distance(&a), 2);
    }

    #[test]
    fn test_hex_line_includes_both_ends() {
        let a = HexCoord::new(0, 0);
        let b = HexCoord::new(3, 0);
        let line = a.line_to(&b, 10);
        assert_eq!(line.len(), 4);
        assert_eq!(line[0], a);
        assert_eq!(line[3], b);
    }

    #[test]
    fn test_hex_line_clipped_to_range() {
        let a = HexCoord::new(0, 0);
        let b = HexCoord::new(6, -3);
        let line = a.line_to(&b, 2);
        assert_eq!(line.len(), 3);
        assert!(line.iter().all(|c| a.distance(c) <= 2));
    }

    #[test]
    fn test_hex_line_steps_are_adjacent() {
        let a = HexCoord::new(-2, 1);
        let b = HexCoord::new(4, -3);
        let line = a.line_to(&b, 20);
        for pair in line.windows(2) {
            assert_eq!(pair[0].distance(&pair[1]), 1);
        }
    }

    #[test]
    fn test_hex_line_tie_breaks_consistently() {
        // (0,0) -> (2,-1) passes exactly between (1,0) and (1,-1)
        let a = HexCoord::new(0, 0);
        let b = HexCoord::new(2, -1);
        assert_eq!(a.line_to(&b, 5), a.line_to(&b, 5));
        assert_eq!(a.line_to(&b, 5).len(), 3);
    }

    #[test]
    fn test_hexes_in_range() {
        let center = HexCoord::new(0, 0);
        assert_eq!(center.hexes_in_range(0).len(), 1);
        assert_eq!(center.hexes_in_range(1).len(), 7);
        assert_eq!(center.hexes_in_range(3).len(), 37);
    }

    #[test]
    fn test_direction_opposite() {
        assert_eq!(HexDirection::East.opposite(), HexDirection::West);
        assert_eq!(HexDirection::NorthEast.opposite(), HexDirection::SouthWest);
    }

    #[test]
    fn test_direction_to_neighbor() {
        let a = HexCoord::new(0, 0);
        for dir in HexDirection::all() {
            assert_eq!(a.direction_to(&a.step(dir)), dir);
        }
    }

    #[test]
    fn test_parse_stage_key() {
        assert_eq!("3,-2".parse::<HexCoord>(), Ok(HexCoord::new(3, -2)));
        assert_eq!(" 1 , 4 ".parse::<HexCoord>(), Ok(HexCoord::new(1, 4)));
        assert!("3".parse::<HexCoord>().is_err());
        assert!("a,b".parse::<HexCoord>().is_err());
    }
}

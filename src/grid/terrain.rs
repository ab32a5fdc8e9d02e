//! Terrain types and their effects on movement and rendering

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Primary terrain type for a battle hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TerrainType {
    #[default]
    Plain, // Standard open ground
    Grass,
    Road,
    Sand,     // Slow footing
    Forest,   // Slow, raised canopy
    Hill,     // Slow, elevated
    Water,    // Wading, sunk below ground level
    Mountain, // Impassable
    Wall,     // Impassable
}

/// Visual grouping used by the renderer to pick tile art
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainGroup {
    Ground,
    Foliage,
    Elevated,
    Liquid,
    Structure,
}

impl TerrainType {
    /// Movement points needed to enter this terrain; `None` is impassable
    pub fn movement_cost(&self) -> Option<u32> {
        match self {
            TerrainType::Plain | TerrainType::Grass | TerrainType::Road => Some(1),
            TerrainType::Sand | TerrainType::Forest | TerrainType::Hill => Some(2),
            TerrainType::Water => Some(3),
            TerrainType::Mountain | TerrainType::Wall => None,
        }
    }

    pub fn is_passable(&self) -> bool {
        self.movement_cost().is_some()
    }

    /// Vertical offset in height units (0 = ground level)
    pub fn height_units(&self) -> f32 {
        match self {
            TerrainType::Plain | TerrainType::Grass | TerrainType::Road | TerrainType::Sand => 0.0,
            TerrainType::Forest => 1.0,
            TerrainType::Hill => 2.0,
            TerrainType::Water => -1.0,
            TerrainType::Mountain => 4.0,
            TerrainType::Wall => 3.0,
        }
    }

    pub fn group(&self) -> TerrainGroup {
        match self {
            TerrainType::Plain | TerrainType::Grass | TerrainType::Road | TerrainType::Sand => {
                TerrainGroup::Ground
            }
            TerrainType::Forest => TerrainGroup::Foliage,
            TerrainType::Hill | TerrainType::Mountain => TerrainGroup::Elevated,
            TerrainType::Water => TerrainGroup::Liquid,
            TerrainType::Wall => TerrainGroup::Structure,
        }
    }

    /// Stage-data key
    pub fn key(&self) -> &'static str {
        match self {
            TerrainType::Plain => "plain",
            TerrainType::Grass => "grass",
            TerrainType::Road => "road",
            TerrainType::Sand => "sand",
            TerrainType::Forest => "forest",
            TerrainType::Hill => "hill",
            TerrainType::Water => "water",
            TerrainType::Mountain => "mountain",
            TerrainType::Wall => "wall",
        }
    }

    pub fn all() -> [TerrainType; 9] {
        [
            TerrainType::Plain,
            TerrainType::Grass,
            TerrainType::Road,
            TerrainType::Sand,
            TerrainType::Forest,
            TerrainType::Hill,
            TerrainType::Water,
            TerrainType::Mountain,
            TerrainType::Wall,
        ]
    }
}

impl FromStr for TerrainType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        TerrainType::all()
            .into_iter()
            .find(|t| t.key().eq_ignore_ascii_case(key))
            .ok_or_else(|| format!("unknown terrain key '{key}'"))
    }
}

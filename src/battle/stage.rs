//! Stage definitions and the enemy manifest grammar
//!
//! A manifest entry reads `CLASS[*count][:q[:r]]`, for example `GOBLIN`,
//! `ARCHER*3`, `ORC:4:-2`, or `SLIME*2:5` (r defaults to 0).

use nom::bytes::complete::take_while1;
use nom::character::complete::{char, i32 as signed, u32 as unsigned};
use nom::combinator::{all_consuming, opt};
use nom::sequence::preceded;
use nom::{IResult, Parser};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use crate::core::error::{Result, TacticsError};
use crate::grid::hex::HexCoord;
use crate::grid::hex_grid::HexGrid;
use crate::grid::terrain::TerrainType;

/// Terrain disk painted before the explicit map cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageBase {
    pub radius: u32,
    #[serde(default)]
    pub terrain: TerrainType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub number: u32,
    #[serde(default)]
    pub name: String,
    /// "q,r" -> terrain key
    #[serde(default)]
    pub map: BTreeMap<String, String>,
    #[serde(default)]
    pub base: Option<StageBase>,
    /// "q,r" cells the party may start on
    #[serde(default)]
    pub deployment: Vec<String>,
    #[serde(default)]
    pub enemies: Vec<String>,
    #[serde(default = "default_enemy_level")]
    pub enemy_level: i32,
    #[serde(default)]
    pub reward_gold: u32,
}

fn default_enemy_level() -> i32 {
    1
}

impl Stage {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            name: String::new(),
            map: BTreeMap::new(),
            base: None,
            deployment: Vec::new(),
            enemies: Vec::new(),
            enemy_level: default_enemy_level(),
            reward_gold: 0,
        }
    }

    /// Paint the base disk, then the map cells. Bad cells are skipped.
    /// Returns the number of map entries applied.
    pub fn paint(&self, grid: &mut HexGrid) -> usize {
        if let Some(base) = self.base {
            for hex in HexCoord::default().hexes_in_range(base.radius) {
                grid.set_terrain(hex, base.terrain);
            }
        }

        let mut painted = 0;
        for (key, terrain_key) in &self.map {
            let hex = match key.parse::<HexCoord>() {
                Ok(hex) => hex,
                Err(reason) => {
                    warn!(stage = self.number, %key, %reason, "Skipping map cell");
                    continue;
                }
            };
            match terrain_key.parse::<TerrainType>() {
                Ok(terrain) => {
                    grid.set_terrain(hex, terrain);
                    painted += 1;
                }
                Err(reason) => warn!(stage = self.number, %key, %reason, "Skipping map cell"),
            }
        }
        painted
    }

    /// Parsed deployment cells in declaration order
    pub fn deployment_cells(&self) -> Vec<HexCoord> {
        self.deployment
            .iter()
            .filter_map(|key| match key.parse::<HexCoord>() {
                Ok(hex) => Some(hex),
                Err(reason) => {
                    warn!(stage = self.number, %key, %reason, "Skipping deployment cell");
                    None
                }
            })
            .collect()
    }
}

/// One parsed manifest line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnemyEntry {
    pub class_key: String,
    pub count: u32,
    pub position: Option<HexCoord>,
}

fn class_key(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_').parse(input)
}

fn manifest(input: &str) -> IResult<&str, (&str, Option<u32>, Option<i32>, Option<i32>)> {
    all_consuming((
        class_key,
        opt(preceded(char('*'), unsigned)),
        opt(preceded(char(':'), signed)),
        opt(preceded(char(':'), signed)),
    ))
    .parse(input)
}

pub fn parse_manifest_entry(entry: &str) -> Result<EnemyEntry> {
    let malformed = |reason: &str| TacticsError::Manifest {
        entry: entry.to_string(),
        reason: reason.to_string(),
    };

    let (_, (class, count, q, r)) = manifest(entry.trim()).map_err(|_| malformed("expected CLASS[*count][:q[:r]]"))?;
    let count = count.unwrap_or(1);
    if count == 0 {
        return Err(malformed("count must be at least 1"));
    }

    Ok(EnemyEntry {
        class_key: class.to_ascii_uppercase(),
        count,
        position: q.map(|q| HexCoord::new(q, r.unwrap_or(0))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_forms() {
        assert_eq!(
            parse_manifest_entry("goblin").unwrap(),
            EnemyEntry {
                class_key: "GOBLIN".into(),
                count: 1,
                position: None
            }
        );
        let archers = parse_manifest_entry("ARCHER*3").unwrap();
        assert_eq!(archers.count, 3);
        assert_eq!(archers.position, None);

        let orc = parse_manifest_entry(" ORC:4:-2 ").unwrap();
        assert_eq!(orc.position, Some(HexCoord::new(4, -2)));
    }

    #[test]
    fn test_missing_r_is_zero() {
        let slime = parse_manifest_entry("SLIME*2:5").unwrap();
        assert_eq!(slime.count, 2);
        assert_eq!(slime.position, Some(HexCoord::new(5, 0)));
    }

    #[test]
    fn test_malformed_entries() {
        for bad in ["", ":1:2", "ORC:x", "ORC*0", "ORC:1:2:3", "ORC*"] {
            assert!(
                matches!(parse_manifest_entry(bad), Err(TacticsError::Manifest { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_paint_base_then_map() {
        let mut stage = Stage::new(1);
        stage.base = Some(StageBase {
            radius: 1,
            terrain: TerrainType::Grass,
        });
        stage.map.insert("1,0".into(), "wall".into());
        stage.map.insert("9,9".into(), "lava".into());
        stage.map.insert("bad".into(), "plain".into());

        let mut grid = HexGrid::new();
        assert_eq!(stage.paint(&mut grid), 1);
        assert_eq!(grid.cell_count(), 7);
        assert_eq!(grid.terrain(HexCoord::new(1, 0)), TerrainType::Wall);
        assert_eq!(grid.terrain(HexCoord::new(0, 1)), TerrainType::Grass);
        assert!(!grid.is_defined(HexCoord::new(9, 9)));
    }

    #[test]
    fn test_deployment_skips_bad_keys() {
        let mut stage = Stage::new(1);
        stage.deployment = vec!["0,0".into(), "nope".into(), "-1,2".into()];
        assert_eq!(
            stage.deployment_cells(),
            vec![HexCoord::new(0, 0), HexCoord::new(-1, 2)]
        );
    }
}

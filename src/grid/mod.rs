//! Spatial model - hex geometry, terrain, movement search, projection
//!
//! Has no dependency on the battle layer; the battle system and the
//! renderer both read it.

pub mod hex;
pub mod hex_grid;
pub mod projection;
pub mod reachable;
pub mod terrain;

pub use hex::{HexCoord, HexDirection};
pub use hex_grid::HexGrid;
pub use projection::Projection;
pub use reachable::Reachable;
pub use terrain::{TerrainGroup, TerrainType};

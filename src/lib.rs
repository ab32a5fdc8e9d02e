//! Hex Tactics - turn-based tactical combat on a hex grid

pub mod battle;
pub mod core;
pub mod grid;
pub mod render;

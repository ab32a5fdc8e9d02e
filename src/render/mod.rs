//! Headless presentation layer
//!
//! Provides the frame-side half of the renderer contract: a fixed-step clock,
//! per-unit visual hints, and projectile retirement.
//! This module never modifies simulation state; projectiles are the one
//! renderer-owned list it advances.

pub mod clock;
pub mod presentation;

pub use clock::FixedStep;
pub use presentation::{retire_projectiles, PresentationTable, UnitVisual};

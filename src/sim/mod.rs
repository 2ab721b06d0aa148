//! Deterministic simulation module
//!
//! All motion and collision logic lives here. This module must be pure and deterministic:
//! - Integer arithmetic only
//! - Seeded RNG only
//! - Stable resolution order (ascending accumulated energy)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod error;
pub mod grid;
pub mod rate;
pub mod state;
pub mod tick;

pub use collision::{ResolveStats, resolve};
pub use entity::{Entity, EntityId, SolidKind};
pub use error::SimError;
pub use grid::{Cell, Grid};
pub use rate::{advance, step_axis};
pub use state::{EntitySnapshot, EntitySpec, Placement, World, WorldSnapshot};
pub use tick::{TickSummary, tick};

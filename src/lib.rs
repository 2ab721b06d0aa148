//! Bouncy Grid - elastic particles on an integer grid
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, rate control, collision resolution)
//! - `settings`: Run configuration
//! - `scenarios`: Preset scenes
//! - `render`: Text frame builder

pub mod render;
pub mod scenarios;
pub mod settings;
pub mod sim;

pub use scenarios::Scenario;
pub use settings::Settings;

/// Simulation constants
pub mod consts {
    /// Largest velocity magnitude on one axis
    pub const MAX_SPEED: i32 = 100;
    /// Energy an axis must accumulate before the entity steps one cell
    pub const ENERGY_THRESHOLD: i32 = 100;
    /// Resolver work budget per entity before it gives up on a tick
    pub const RESOLVE_STEPS_PER_ENTITY: usize = 256;
    /// Times one entity may be taken off the resolver queue before it is held for the tick
    pub const RESOLVE_VISITS_PER_ENTITY: usize = 16;
    /// Elasticity assigned when none is given (stored, not applied)
    pub const DEFAULT_ELASTICITY: u8 = 100;

    /// Default grid dimensions
    pub const DEFAULT_ROWS: u32 = 50;
    pub const DEFAULT_COLS: u32 = 120;

    /// Glyphs
    pub const BOUNDARY_GLYPH: char = '#';
    pub const EMPTY_GLYPH: char = ' ';
    pub const DEFAULT_SYMBOL: char = '@';
}

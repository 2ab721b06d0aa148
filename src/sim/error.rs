//! Simulation errors

use thiserror::Error;

/// Errors raised while building or stepping a world.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SimError {
    #[error("grid must be at least 3x3 to have an interior, got {rows}x{cols}")]
    InvalidDimensions { rows: u32, cols: u32 },
    #[error("cannot place entity at ({x}, {y}): occupied, boundary or out of range")]
    OccupiedOrInvalidPosition { x: i32, y: i32 },
    #[error("velocity ({x}, {y}) outside [-100, 100]")]
    InvalidVelocity { x: i32, y: i32 },
    #[error("energy ({x}, {y}) outside [0, 99]")]
    InvalidEnergy { x: i32, y: i32 },
    #[error("no unoccupied interior cell left")]
    GridFull,
    #[error("collision resolution did not settle within {steps} steps")]
    ResolverDiverged { steps: usize },
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

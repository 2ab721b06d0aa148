//! Rate control
//!
//! Turns a velocity (percent of a cell per tick) into whole-cell steps with a
//! per-axis phase accumulator. The remainder is carried forward exactly, so
//! over any run the displacement on an axis equals `floor(total_energy / 100)`
//! with no drift.

use glam::IVec2;

use super::entity::Entity;
use crate::consts::ENERGY_THRESHOLD;

/// Advance one axis accumulator. Returns `(delta, energy)`.
#[inline]
pub fn step_axis(velocity: i32, energy: i32) -> (i32, i32) {
    let energy = energy + velocity.abs();
    if energy >= ENERGY_THRESHOLD {
        (velocity.signum(), energy - ENERGY_THRESHOLD)
    } else {
        (0, energy)
    }
}

/// Run the accumulator for both axes and set this tick's delta and target.
/// Immobile bodies stay put and accumulate nothing.
pub fn advance(entity: &mut Entity) {
    if !entity.is_mobile() {
        entity.delta = IVec2::ZERO;
        entity.target = entity.pos;
        return;
    }
    let (dx, ex) = step_axis(entity.velocity.x, entity.energy.x);
    let (dy, ey) = step_axis(entity.velocity.y, entity.energy.y);
    entity.delta = IVec2::new(dx, dy);
    entity.energy = IVec2::new(ex, ey);
    entity.target = entity.pos + entity.delta;
}

//! Fixed step simulation tick
//!
//! Advances the world by one discrete time unit: rate control, collision
//! resolution, then a two-pass commit of movement.

use super::collision::resolve;
use super::error::SimError;
use super::rate::advance;
use super::state::World;

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Tick number just completed (1-based)
    pub tick: u64,
    /// Entities that changed cell
    pub moved: usize,
    /// Resolver queue iterations
    pub resolver_steps: usize,
}

/// Advance the world by one tick.
///
/// Only fails if collision resolution exhausts its work budget. Bodies the
/// resolver gave up on stay in their cells, everyone else still moves, the
/// tick counts and the world stays consistent, so the caller may keep
/// ticking.
pub fn tick(world: &mut World) -> Result<TickSummary, SimError> {
    for entity in world.entities.iter_mut() {
        advance(entity);
    }

    let resolved = resolve(&world.grid, &mut world.entities);

    // Two passes: the second lets a body follow into a cell vacated during the first
    let mut moved = 0;
    for _ in 0..2 {
        for entity in world.entities.iter_mut() {
            if entity.target != entity.pos && world.grid.is_empty(entity.target) {
                world.grid.vacate(entity.pos);
                world.grid.occupy(entity.target, entity.id)?;
                entity.pos = entity.target;
                moved += 1;
            }
        }
    }

    world.time_ticks += 1;
    debug_assert!(
        world.check_invariants().is_ok(),
        "{:?}",
        world.check_invariants()
    );

    let stats = resolved?;
    log::trace!(
        "tick {}: {} moved, {} resolver steps, {} held",
        world.time_ticks,
        moved,
        stats.steps,
        stats.held
    );

    Ok(TickSummary {
        tick: world.time_ticks,
        moved,
        resolver_steps: stats.steps,
    })
}

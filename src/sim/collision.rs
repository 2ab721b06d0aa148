//! Collision resolution
//!
//! The tricky part of the engine: given every entity's proposed target cell,
//! settle walls, head-on swaps and N-way contention for one cell into new
//! velocities, so that the commit step never has two bodies fighting over a
//! cell. Works through a queue ordered by accumulated energy; entities whose
//! velocity changes because of someone else's impact go back on the queue
//! (chain reactions).

use std::collections::VecDeque;

use glam::IVec2;

use super::entity::Entity;
use super::error::SimError;
use super::grid::{Cell, Grid};
use crate::consts::{RESOLVE_STEPS_PER_ENTITY, RESOLVE_VISITS_PER_ENTITY};

/// Counters from one resolution pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    /// Queue iterations performed
    pub steps: usize,
    pub bounces: usize,
    pub contentions: usize,
    pub swaps: usize,
    /// Bodies told to stay put this tick (pinned, or out of visits)
    pub held: usize,
}

/// Resolve all proposed targets in place.
///
/// Entity IDs must equal their index in `entities`. The grid is read-only
/// here; it still reflects positions from the start of the tick.
///
/// Every entity is visited at most `RESOLVE_VISITS_PER_ENTITY + 1` times, so
/// the pass always ends well inside the step budget. A body knocked back by
/// a contention that then meets a wall is pinned: it keeps the reversed
/// velocity but stays in its cell for this tick.
///
/// If the budget is exhausted anyway, the entities still queued are told to
/// hold still and `SimError::ResolverDiverged` is returned; the rest keep
/// their resolved targets.
pub fn resolve(grid: &Grid, entities: &mut [Entity]) -> Result<ResolveStats, SimError> {
    let budget = RESOLVE_STEPS_PER_ENTITY * entities.len().max(1);
    resolve_within(grid, entities, budget)
}

fn resolve_within(
    grid: &Grid,
    entities: &mut [Entity],
    budget: usize,
) -> Result<ResolveStats, SimError> {
    let n = entities.len();
    let mut queue: VecDeque<usize> = (0..n).collect();
    sort_queue(&mut queue, entities);

    let mut visits = vec![0usize; n];
    // Velocity changed by a contention during this pass
    let mut struck = vec![false; n];
    // Out of visits; never queued again this pass
    let mut settled = vec![false; n];
    let mut stats = ResolveStats::default();

    while let Some(&head) = queue.front() {
        if stats.steps >= budget {
            log::error!(
                "collision resolution gave up after {} steps with {} entities queued",
                stats.steps,
                queue.len()
            );
            for &i in &queue {
                hold(&mut entities[i]);
            }
            stats.held += queue.len();
            return Err(SimError::ResolverDiverged { steps: stats.steps });
        }
        stats.steps += 1;
        visits[head] += 1;

        if visits[head] > RESOLVE_VISITS_PER_ENTITY {
            log::debug!("{} unsettled after {} visits, holding", entities[head].id, visits[head] - 1);
            settled[head] = true;
            hold(&mut entities[head]);
            stats.held += 1;
            queue.pop_front();
            continue;
        }

        let target = entities[head].target;

        // --- WALLS ---
        if grid.is_boundary(target) {
            stats.bounces += 1;
            bounce_off_boundary(grid, &mut entities[head]);
            if struck[head] {
                // Pinned between a wall and whatever knocked it back
                hold(&mut entities[head]);
                stats.held += 1;
                queue.pop_front();
            } else if grid.is_boundary(entities[head].target) {
                // Still facing a wall (concave corner): stop trying this tick
                queue.pop_front();
            }
            continue;
        }

        // --- CONTENTION ---
        let group: Vec<usize> = entities
            .iter()
            .enumerate()
            .filter(|(_, e)| e.target == target)
            .map(|(i, _)| i)
            .collect();
        if group.len() > 1 {
            stats.contentions += 1;
            let requeue = exchange_momentum(&group, entities);
            log::debug!(
                "contention for {target}: {} bodies, {} requeued",
                group.len(),
                requeue.len()
            );
            queue.pop_front();
            for i in requeue {
                struck[i] = true;
                enqueue(&mut queue, &settled, i);
            }
            continue;
        }

        // --- HEAD-ON SWAP / STATIONARY OCCUPANT ---
        if let Some(Cell::Entity(other)) = grid.cell(target) {
            let other = other.0 as usize;
            let me = &entities[head];
            let occupant = &entities[other];
            if other != head
                && me.pos != target
                && (occupant.delta == IVec2::ZERO || occupant.target == me.pos)
            {
                stats.swaps += 1;
                let mine = entities[head].velocity;
                let theirs = entities[other].velocity;
                entities[head].set_velocity(theirs);
                entities[other].set_velocity(mine);
                entities[head].aim();
                entities[other].aim();
                log::debug!("swap {} <-> {}", entities[head].id, entities[other].id);

                queue.pop_front();
                enqueue(&mut queue, &settled, other);
                sort_queue(&mut queue, entities);
                continue;
            }
        }

        // Free path (or nothing we can act on)
        queue.pop_front();
    }

    // Later impacts may have re-aimed a settled body
    for (entity, _) in entities.iter_mut().zip(&settled).filter(|(_, s)| **s) {
        hold(entity);
    }

    Ok(stats)
}

/// Queue an entity for another look, at most once at a time
fn enqueue(queue: &mut VecDeque<usize>, settled: &[bool], i: usize) {
    if !settled[i] && !queue.contains(&i) {
        queue.push_back(i);
    }
}

/// Keep an entity in its cell for the rest of the tick
fn hold(entity: &mut Entity) {
    entity.delta = IVec2::ZERO;
    entity.target = entity.pos;
}

/// Stable sort by ascending average energy
fn sort_queue(queue: &mut VecDeque<usize>, entities: &[Entity]) {
    queue
        .make_contiguous()
        .sort_by_key(|&i| entities[i].energy_key());
}

/// Reflect only the axes the wall actually blocks.
///
/// A diagonal mover hitting a flat wall keeps its motion along the wall and
/// reverses the other axis; hitting a corner reverses both.
fn bounce_off_boundary(grid: &Grid, entity: &mut Entity) {
    let x_only_open = grid.is_open_for(entity.x_only_step(), entity.id);
    let y_only_open = grid.is_open_for(entity.y_only_step(), entity.id);

    let mut velocity = entity.velocity;
    if entity.delta.x != 0 && (y_only_open || !x_only_open) {
        velocity.x = -velocity.x;
    }
    if entity.delta.y != 0 && (x_only_open || !y_only_open) {
        velocity.y = -velocity.y;
    }

    log::debug!(
        "{} bounced at {}: {} -> {}",
        entity.id,
        entity.pos,
        entity.velocity,
        velocity
    );
    entity.set_velocity(velocity);
    entity.aim();
}

/// Elastic impact between every body aiming at the same cell.
///
/// On each axis where a member's direction differs from others, its new
/// velocity is the sum of those others' velocities on that axis; axes with
/// no conflict keep their velocity. Returns members to re-resolve.
fn exchange_momentum(group: &[usize], entities: &mut [Entity]) -> Vec<usize> {
    let mut requeue: Vec<usize> = Vec::new();
    let mut updated: Vec<IVec2> = Vec::with_capacity(group.len());

    for &m in group {
        let me = &entities[m];
        let mut sum = IVec2::ZERO;
        let (mut conflict_x, mut conflict_y) = (false, false);

        for &o in group {
            let other = &entities[o];
            if other.delta == me.delta {
                continue;
            }
            if !requeue.contains(&o) {
                requeue.push(o);
            }
            if other.delta.x != me.delta.x {
                sum.x += other.velocity.x;
                conflict_x = true;
            }
            if other.delta.y != me.delta.y {
                sum.y += other.velocity.y;
                conflict_y = true;
            }
        }

        updated.push(IVec2::new(
            if conflict_x { sum.x } else { me.velocity.x },
            if conflict_y { sum.y } else { me.velocity.y },
        ));
    }

    for (&m, velocity) in group.iter().zip(updated) {
        entities[m].set_velocity(velocity);
        entities[m].aim();
    }

    requeue
}

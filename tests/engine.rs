//! End-to-end behaviour of the tick driver through the public API

use bouncy_grid::consts::RESOLVE_STEPS_PER_ENTITY;
use bouncy_grid::sim::{EntitySpec, World, tick};
use glam::IVec2;

fn world_with(rows: u32, cols: u32, bodies: &[(i32, i32, i32, i32)]) -> World {
    let mut world = World::new(rows, cols, 0).unwrap();
    for &(x, y, vx, vy) in bodies {
        world
            .add_entity(EntitySpec::new('@').at(x, y).velocity(vx, vy))
            .unwrap();
    }
    world
}

/// Run `ticks` ticks; every one must resolve well inside the budget
fn run_bounded(world: &mut World, ticks: usize) {
    let cap = RESOLVE_STEPS_PER_ENTITY * world.entities().len().max(1);
    for _ in 0..ticks {
        let summary = tick(world).unwrap();
        assert!(summary.resolver_steps < cap, "tick {} used {} steps", summary.tick, summary.resolver_steps);
        world.check_invariants().unwrap();
    }
}

#[test]
fn single_entity_bounces_off_far_wall() {
    let mut world = world_with(10, 10, &[(5, 5, 0, 100)]);

    tick(&mut world).unwrap();
    assert_eq!(world.entities()[0].pos, IVec2::new(5, 6));

    // Walk up to the cell next to the wall with velocity unchanged
    while world.entities()[0].pos.y < 8 {
        tick(&mut world).unwrap();
        assert_eq!(world.entities()[0].velocity, IVec2::new(0, 100));
    }

    tick(&mut world).unwrap();
    let e = &world.entities()[0];
    assert_eq!(e.velocity, IVec2::new(0, -100));
    assert_eq!(e.pos, IVec2::new(5, 7));
    assert!(world.grid().is_interior(e.pos));
}

#[test]
fn terminates_for_one_entity_against_wall() {
    let mut world = world_with(6, 6, &[(1, 1, -100, -100)]);
    run_bounded(&mut world, 100);
}

#[test]
fn terminates_for_head_on_pair() {
    let mut world = world_with(9, 30, &[(4, 2, 0, 100), (4, 27, 0, -100)]);
    run_bounded(&mut world, 200);
}

#[test]
fn terminates_for_three_converging() {
    let mut world = world_with(
        21,
        21,
        &[(10, 5, 0, 100), (10, 15, 0, -100), (5, 10, 100, 0)],
    );
    run_bounded(&mut world, 200);
}

#[test]
fn terminates_for_same_direction_chase() {
    let mut world = world_with(9, 30, &[(4, 2, 0, 100), (4, 3, 0, 100)]);
    run_bounded(&mut world, 200);
}

#[test]
fn stationary_body_passes_momentum_along() {
    // Newton's cradle in one row: the mover stops, the struck body carries on
    let mut world = world_with(7, 20, &[(3, 2, 0, 100), (3, 6, 0, 0)]);
    for _ in 0..4 {
        tick(&mut world).unwrap();
    }
    let mover = &world.entities()[0];
    let struck = &world.entities()[1];
    assert_eq!(mover.velocity, IVec2::ZERO);
    assert_eq!(mover.pos, IVec2::new(3, 5));
    assert_eq!(struck.velocity, IVec2::new(0, 100));
    assert_eq!(struck.pos, IVec2::new(3, 7));
}

#[test]
fn seeded_runs_replay_identically() {
    let run = |seed| {
        let mut world = World::new(20, 40, seed).unwrap();
        for _ in 0..30 {
            world.add_entity(EntitySpec::new('@')).unwrap();
        }
        for _ in 0..100 {
            let _ = tick(&mut world);
        }
        world.snapshot()
    };
    assert_eq!(run(1234), run(1234));
}

//! World state and construction
//!
//! Owns the grid, the entity population and the seeded RNG used for random
//! placement and velocities. The population is fixed once the run starts.

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId, SolidKind};
use super::error::SimError;
use super::grid::{Cell, Grid};
use crate::consts::*;

/// Where a new entity goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// Any empty interior cell, chosen by the world's RNG
    #[default]
    Random,
    At(IVec2),
}

/// Description of an entity to add
#[derive(Debug, Clone)]
pub struct EntitySpec {
    pub symbol: char,
    pub placement: Placement,
    /// `None` draws each axis uniformly from [-100, 100]
    pub velocity: Option<IVec2>,
    pub energy: IVec2,
    pub solid: SolidKind,
    pub elasticity: u8,
}

impl EntitySpec {
    pub fn new(symbol: char) -> Self {
        Self {
            symbol,
            placement: Placement::Random,
            velocity: None,
            energy: IVec2::ZERO,
            solid: SolidKind::Bouncy,
            elasticity: DEFAULT_ELASTICITY,
        }
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.placement = Placement::At(IVec2::new(x, y));
        self
    }

    pub fn velocity(mut self, x: i32, y: i32) -> Self {
        self.velocity = Some(IVec2::new(x, y));
        self
    }

    /// Starting accumulator phase (for replays)
    pub fn energy(mut self, x: i32, y: i32) -> Self {
        self.energy = IVec2::new(x, y);
        self
    }

    pub fn immobile(mut self) -> Self {
        self.solid = SolidKind::Immobile;
        self
    }

    pub fn elasticity(mut self, elasticity: u8) -> Self {
        self.elasticity = elasticity;
        self
    }
}

/// Serializable view of one entity for renderers and tooling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub symbol: char,
    pub pos: IVec2,
    pub velocity: IVec2,
}

/// Serializable view of the whole world
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub rows: u32,
    pub cols: u32,
    pub entities: Vec<EntitySnapshot>,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    pub(crate) grid: Grid,
    /// Indexed by `EntityId`
    pub(crate) entities: Vec<Entity>,
    rng: Pcg32,
    /// Simulation tick counter
    pub(crate) time_ticks: u64,
}

impl World {
    /// Create an empty world whose RNG is seeded with `seed`
    pub fn new(rows: u32, cols: u32, seed: u64) -> Result<Self, SimError> {
        Self::with_rng(rows, cols, Pcg32::seed_from_u64(seed))
    }

    /// Create an empty world drawing randomness from `rng`
    pub fn with_rng(rows: u32, cols: u32, rng: Pcg32) -> Result<Self, SimError> {
        Ok(Self {
            grid: Grid::new(rows, cols)?,
            entities: Vec::new(),
            rng,
            time_ticks: 0,
        })
    }

    /// Add an entity. Fails without side effects on a bad position or value.
    pub fn add_entity(&mut self, spec: EntitySpec) -> Result<EntityId, SimError> {
        let velocity = match spec.velocity {
            Some(v) => {
                if v.abs().max_element() > MAX_SPEED {
                    return Err(SimError::InvalidVelocity { x: v.x, y: v.y });
                }
                v
            }
            None => IVec2::new(
                self.rng.random_range(-MAX_SPEED..=MAX_SPEED),
                self.rng.random_range(-MAX_SPEED..=MAX_SPEED),
            ),
        };
        if spec.energy.min_element() < 0 || spec.energy.max_element() >= ENERGY_THRESHOLD {
            return Err(SimError::InvalidEnergy {
                x: spec.energy.x,
                y: spec.energy.y,
            });
        }

        let pos = match spec.placement {
            Placement::At(pos) => pos,
            Placement::Random => {
                let free = self.grid.empty_interior();
                if free.is_empty() {
                    return Err(SimError::GridFull);
                }
                free[self.rng.random_range(0..free.len())]
            }
        };

        let id = EntityId(self.entities.len() as u32);
        self.grid.occupy(pos, id)?;

        let mut entity = Entity::new(id, spec.symbol, pos, velocity);
        entity.energy = spec.energy;
        entity.solid = spec.solid;
        entity.elasticity = spec.elasticity;
        if entity.solid == SolidKind::Immobile {
            entity.velocity = IVec2::ZERO;
        }
        self.entities.push(entity);
        Ok(id)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.0 as usize)
    }

    pub fn rows(&self) -> u32 {
        self.grid.rows()
    }

    pub fn cols(&self) -> u32 {
        self.grid.cols()
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.time_ticks,
            rows: self.rows(),
            cols: self.cols(),
            entities: self
                .entities
                .iter()
                .map(|e| EntitySnapshot {
                    id: e.id,
                    symbol: e.symbol,
                    pos: e.pos,
                    velocity: e.velocity,
                })
                .collect(),
        }
    }

    /// Verify occupancy and range invariants. A failure here is a resolver bug.
    pub fn check_invariants(&self) -> Result<(), SimError> {
        let mut claimed = 0usize;
        for (pos, cell) in self.grid.iter() {
            match cell {
                Cell::Boundary if self.grid.is_interior(pos) => {
                    return Err(SimError::InvariantViolation(format!(
                        "boundary cell inside the ring at {pos}"
                    )));
                }
                Cell::Entity(id) => {
                    claimed += 1;
                    match self.entity(id) {
                        Some(e) if e.pos == pos => {}
                        _ => {
                            return Err(SimError::InvariantViolation(format!(
                                "cell {pos} names {id} which is not there"
                            )));
                        }
                    }
                }
                _ => {}
            }
        }
        if claimed != self.entities.len() {
            return Err(SimError::InvariantViolation(format!(
                "{} entities but {claimed} occupied cells",
                self.entities.len()
            )));
        }

        for e in &self.entities {
            if !self.grid.is_interior(e.pos) {
                return Err(SimError::InvariantViolation(format!(
                    "{} sits on boundary cell {}",
                    e.id, e.pos
                )));
            }
            if !self.grid.in_bounds(e.target) {
                return Err(SimError::InvariantViolation(format!(
                    "{} targets {} off the grid",
                    e.id, e.target
                )));
            }
            if e.velocity.abs().max_element() > MAX_SPEED
                || e.energy.min_element() < 0
                || e.energy.max_element() >= ENERGY_THRESHOLD
            {
                return Err(SimError::InvariantViolation(format!(
                    "{} has velocity {} energy {}",
                    e.id, e.velocity, e.energy
                )));
            }
        }
        Ok(())
    }
}

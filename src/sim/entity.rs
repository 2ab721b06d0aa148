//! Moving point bodies

use std::fmt;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_SPEED;

/// Stable entity handle (index into the world's entity list)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a body reacts to impacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SolidKind {
    /// Moves and exchanges momentum
    #[default]
    Bouncy,
    /// Never moves, never changes velocity
    Immobile,
}

/// A point body occupying one cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    /// Opaque to the simulation, used by rendering only
    pub symbol: char,
    pub solid: SolidKind,
    /// Reserved; collisions are always fully elastic
    pub elasticity: u8,
    /// Per-axis velocity in [-100, 100]
    pub velocity: IVec2,
    /// Per-axis sub-cell accumulator in [0, 99]
    pub energy: IVec2,
    /// Unit step taken this tick
    pub delta: IVec2,
    pub pos: IVec2,
    /// Cell proposed for the end of this tick
    pub target: IVec2,
}

impl Entity {
    pub fn new(id: EntityId, symbol: char, pos: IVec2, velocity: IVec2) -> Self {
        Self {
            id,
            symbol,
            solid: SolidKind::Bouncy,
            elasticity: crate::consts::DEFAULT_ELASTICITY,
            velocity,
            energy: IVec2::ZERO,
            delta: IVec2::ZERO,
            pos,
            target: pos,
        }
    }

    pub fn is_mobile(&self) -> bool {
        self.solid == SolidKind::Bouncy
    }

    /// Replace the velocity, clamped to the legal range. Immobile bodies ignore this.
    pub fn set_velocity(&mut self, velocity: IVec2) {
        if self.is_mobile() {
            self.velocity = velocity.clamp(IVec2::splat(-MAX_SPEED), IVec2::splat(MAX_SPEED));
        }
    }

    /// Point delta and target along the current velocity direction.
    ///
    /// Used after a collision changed the velocity: the entity commits to a
    /// full step in its new direction regardless of accumulated energy.
    pub fn aim(&mut self) {
        self.delta = if self.is_mobile() {
            self.velocity.signum()
        } else {
            IVec2::ZERO
        };
        self.target = self.pos + self.delta;
    }

    /// Resolution order key: ascending average energy (sum keeps it integral)
    #[inline]
    pub fn energy_key(&self) -> i32 {
        self.energy.x + self.energy.y
    }

    /// Position reached by stepping along one axis only
    pub fn x_only_step(&self) -> IVec2 {
        self.pos + IVec2::new(self.delta.x, 0)
    }

    pub fn y_only_step(&self) -> IVec2 {
        self.pos + IVec2::new(0, self.delta.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aim_follows_velocity_sign() {
        let mut e = Entity::new(EntityId(0), '@', IVec2::new(4, 4), IVec2::new(-30, 70));
        e.aim();
        assert_eq!(e.delta, IVec2::new(-1, 1));
        assert_eq!(e.target, IVec2::new(3, 5));

        e.set_velocity(IVec2::new(0, -1));
        e.aim();
        assert_eq!(e.delta, IVec2::new(0, -1));
        assert_eq!(e.target, IVec2::new(4, 3));
    }

    #[test]
    fn test_set_velocity_clamps() {
        let mut e = Entity::new(EntityId(0), '@', IVec2::ONE, IVec2::ZERO);
        e.set_velocity(IVec2::new(180, -150));
        assert_eq!(e.velocity, IVec2::new(100, -100));
    }

    #[test]
    fn test_immobile_ignores_updates() {
        let mut e = Entity::new(EntityId(0), 'X', IVec2::new(2, 2), IVec2::ZERO);
        e.solid = SolidKind::Immobile;
        e.set_velocity(IVec2::new(50, 50));
        e.aim();
        assert_eq!(e.velocity, IVec2::ZERO);
        assert_eq!(e.delta, IVec2::ZERO);
        assert_eq!(e.target, e.pos);
    }

    #[test]
    fn test_single_axis_steps() {
        let mut e = Entity::new(EntityId(0), '@', IVec2::new(5, 5), IVec2::new(100, -100));
        e.aim();
        assert_eq!(e.x_only_step(), IVec2::new(6, 5));
        assert_eq!(e.y_only_step(), IVec2::new(5, 4));
    }
}

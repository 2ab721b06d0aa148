//! Preset scenes
//!
//! Hand-built layouts that exercise specific collision cases, plus the
//! random swarm driven by `Settings`.

use crate::settings::Settings;
use crate::sim::{EntitySpec, SimError, World};

/// A named starting layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scenario {
    /// Two horizontal and two diagonal movers; the diagonals meet at a corner
    CornerMeet,
    /// Two movers hit one stationary body from opposite sides at once
    StationarySandwich,
    /// Same, with two stationary bodies side by side
    DoubleStationary,
    /// Two movers aim at the same free cell
    TwoWay,
    /// Three movers aim at the same free cell
    ThreeWay,
    /// A mover steps into a cell its neighbour is leaving
    VacateFollow,
    /// Two bodies travel in line and the leader hits a third
    Convoy,
    /// Two movers strike a stationary body from different angles
    ObliqueStationary,
    /// Randomly placed swarm sized by settings
    #[default]
    Random,
}

impl Scenario {
    pub const ALL: [Scenario; 9] = [
        Scenario::CornerMeet,
        Scenario::StationarySandwich,
        Scenario::DoubleStationary,
        Scenario::TwoWay,
        Scenario::ThreeWay,
        Scenario::VacateFollow,
        Scenario::Convoy,
        Scenario::ObliqueStationary,
        Scenario::Random,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::CornerMeet => "corner-meet",
            Scenario::StationarySandwich => "stationary-sandwich",
            Scenario::DoubleStationary => "double-stationary",
            Scenario::TwoWay => "two-way",
            Scenario::ThreeWay => "three-way",
            Scenario::VacateFollow => "vacate-follow",
            Scenario::Convoy => "convoy",
            Scenario::ObliqueStationary => "oblique-stationary",
            Scenario::Random => "random",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.to_lowercase().replace('_', "-");
        Self::ALL.into_iter().find(|scenario| scenario.as_str() == s)
    }

    /// Build the world for this scenario
    pub fn build(&self, settings: &Settings, seed: u64) -> Result<World, SimError> {
        // (rows, cols, [(x, y, vx, vy)])
        let (rows, cols, bodies): (u32, u32, Vec<(i32, i32, i32, i32)>) = match self {
            Scenario::CornerMeet => (
                50,
                50,
                vec![(1, 2, 0, 100), (1, 10, 0, -50), (1, 1, 100, 100), (48, 48, -100, -100)],
            ),
            Scenario::StationarySandwich => {
                (50, 51, vec![(1, 1, 0, 100), (1, 25, 0, 0), (1, 49, 0, -100)])
            }
            Scenario::DoubleStationary => (
                50,
                50,
                vec![(1, 1, 0, 100), (1, 24, 0, 0), (1, 25, 0, 0), (1, 48, 0, -100)],
            ),
            Scenario::TwoWay => (50, 51, vec![(17, 1, 0, 100), (1, 49, -50, -50)]),
            Scenario::ThreeWay => (
                60,
                51,
                vec![(17, 1, 0, 100), (1, 49, -50, -50), (49, 33, -100, 0)],
            ),
            Scenario::VacateFollow => (50, 50, vec![(5, 5, 0, 100), (5, 6, 100, 100)]),
            Scenario::Convoy => (50, 50, vec![(5, 5, 0, 100), (5, 10, 0, -50), (5, 11, 0, -50)]),
            Scenario::ObliqueStationary => (
                50,
                51,
                vec![(10, 5, 0, 100), (15, 15, -100, -100), (10, 10, 0, 0)],
            ),
            Scenario::Random => {
                let mut world = World::new(settings.rows, settings.cols, seed)?;
                for _ in 0..settings.entities {
                    world.add_entity(EntitySpec::new(settings.symbol))?;
                }
                return Ok(world);
            }
        };

        let mut world = World::new(rows, cols, seed)?;
        for (x, y, vx, vy) in bodies {
            world.add_entity(EntitySpec::new(settings.symbol).at(x, y).velocity(vx, vy))?;
        }
        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tick;

    #[test]
    fn test_names_round_trip() {
        for scenario in Scenario::ALL {
            assert_eq!(Scenario::from_str(scenario.as_str()), Some(scenario));
        }
        assert_eq!(Scenario::from_str("Three_Way"), Some(Scenario::ThreeWay));
        assert_eq!(Scenario::from_str("four-way"), None);
    }

    #[test]
    fn test_every_scenario_runs_clean() {
        let settings = Settings {
            rows: 20,
            cols: 40,
            entities: 60,
            ..Default::default()
        };
        for scenario in Scenario::ALL {
            let mut world = scenario.build(&settings, 42).unwrap();
            world.check_invariants().unwrap();
            for _ in 0..300 {
                if let Err(e) = tick(&mut world) {
                    panic!("{}: {e}", scenario.as_str());
                }
                world
                    .check_invariants()
                    .unwrap_or_else(|e| panic!("{}: {e}", scenario.as_str()));
            }
        }
    }

    #[test]
    fn test_random_respects_settings() {
        let settings = Settings {
            rows: 15,
            cols: 25,
            entities: 12,
            symbol: '*',
            ..Default::default()
        };
        let world = Scenario::Random.build(&settings, 5).unwrap();
        assert_eq!((world.rows(), world.cols()), (15, 25));
        assert_eq!(world.entities().len(), 12);
        assert!(world.entities().iter().all(|e| e.symbol == '*'));
    }

    #[test]
    fn test_random_too_crowded() {
        let settings = Settings {
            rows: 4,
            cols: 4,
            entities: 5,
            ..Default::default()
        };
        assert_eq!(Scenario::Random.build(&settings, 0).unwrap_err(), SimError::GridFull);
    }
}

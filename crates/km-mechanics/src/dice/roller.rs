//! Sources of die results.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{MechError, MechResult};

/// Produces the face of one die at a time.
pub trait DiceRoller {
    /// Roll a die with `sides` faces, returning a value in `1..=sides`.
    fn roll_die(&mut self, sides: u32) -> MechResult<u32>;
}

/// Rolls with a standard RNG.
#[derive(Debug, Clone)]
pub struct StdRoller {
    rng: StdRng,
}

impl StdRoller {
    /// A roller with a fixed seed; identical seeds roll identical dice.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// A roller seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Seeded when a seed is given, otherwise from entropy.
    pub fn new(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }
}

impl DiceRoller for StdRoller {
    fn roll_die(&mut self, sides: u32) -> MechResult<u32> {
        Ok(self.rng.random_range(1..=sides.max(1)))
    }
}

/// Plays back die results rolled at the table.
///
/// Values are consumed in order, one per die. Once they run out the
/// fallback roller takes over, or rolling fails if there is none.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRoller {
    values: VecDeque<u32>,
    fallback: Option<StdRoller>,
}

impl ScriptedRoller {
    /// Play back the given values.
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            values: values.into_iter().collect(),
            fallback: None,
        }
    }

    /// Roll with `fallback` once the scripted values are exhausted.
    pub fn with_fallback(mut self, fallback: StdRoller) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Scripted values not yet used.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl DiceRoller for ScriptedRoller {
    fn roll_die(&mut self, sides: u32) -> MechResult<u32> {
        match self.values.pop_front() {
            Some(value) if (1..=sides).contains(&value) => Ok(value),
            Some(value) => Err(MechError::InvalidRoll { value, sides }),
            None => match self.fallback.as_mut() {
                Some(rng) => rng.roll_die(sides),
                None => Err(MechError::NoMoreRolls(sides)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn std_roller_stays_in_range() {
        let mut roller = StdRoller::seeded(7);
        for _ in 0..200 {
            let v = roller.roll_die(20).unwrap();
            assert!((1..=20).contains(&v));
        }
    }

    #[test]
    fn scripted_rejects_impossible_faces() {
        let mut roller = ScriptedRoller::new([21]);
        assert!(matches!(
            roller.roll_die(20),
            Err(MechError::InvalidRoll { value: 21, sides: 20 })
        ));
    }

    #[test]
    fn scripted_runs_out() {
        let mut roller = ScriptedRoller::new([4]);
        assert_eq!(roller.roll_die(6).unwrap(), 4);
        assert_eq!(roller.remaining(), 0);
        assert!(matches!(roller.roll_die(6), Err(MechError::NoMoreRolls(6))));
    }

    #[test]
    fn scripted_falls_back_to_rng() {
        let mut roller = ScriptedRoller::new([2]).with_fallback(StdRoller::seeded(1));
        assert_eq!(roller.roll_die(4).unwrap(), 2);
        assert!((1..=4).contains(&roller.roll_die(4).unwrap()));
    }
}

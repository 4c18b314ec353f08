//! A bag of dice rolled together, such as the resource dice.

use super::Die;
use super::roll::{DieResult, RollResult};
use super::roller::DiceRoller;
use crate::error::MechResult;

/// A collection of dice to be rolled together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DicePool {
    /// The dice in this pool.
    pub dice: Vec<Die>,
}

impl DicePool {
    /// Create an empty dice pool.
    pub fn new() -> Self {
        Self { dice: Vec::new() }
    }

    /// Add `count` dice of the given type.
    pub fn add(mut self, die: Die, count: u32) -> Self {
        self.dice.extend(std::iter::repeat_n(die, count as usize));
        self
    }

    /// Roll all dice in the pool.
    pub fn roll<R: DiceRoller + ?Sized>(&self, roller: &mut R) -> MechResult<RollResult> {
        let dice = self
            .dice
            .iter()
            .map(|die| {
                roller.roll_die(die.sides()).map(|value| DieResult { die: *die, value })
            })
            .collect::<MechResult<Vec<_>>>()?;
        Ok(RollResult { dice })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{ScriptedRoller, StdRoller};

    #[test]
    fn add_repeats_the_die() {
        let pool = DicePool::new().add(Die::D20, 2).add(Die::D6, 3);
        assert_eq!(pool.dice.len(), 5);
        assert_eq!(pool.dice[1], Die::D20);
        assert_eq!(pool.dice[2], Die::D6);
    }

    #[test]
    fn roll_produces_valid_values() {
        let mut roller = StdRoller::seeded(42);
        let pool = DicePool::new().add(Die::D6, 10);
        let result = pool.roll(&mut roller).unwrap();
        assert_eq!(result.dice.len(), 10);
        for die_result in &result.dice {
            assert!((1..=6).contains(&die_result.value));
        }
    }

    #[test]
    fn roll_deterministic_with_seed() {
        let pool = DicePool::new().add(Die::D20, 3);
        let r1 = pool.roll(&mut StdRoller::seeded(99)).unwrap();
        let r2 = pool.roll(&mut StdRoller::seeded(99)).unwrap();
        assert_eq!(r1, r2);
    }

    #[test]
    fn scripted_values_are_used_in_order() {
        let pool = DicePool::new().add(Die::D4, 2);
        let mut roller = ScriptedRoller::new([3, 1]);
        let result = pool.roll(&mut roller).unwrap();
        assert_eq!(result.total(), 4);
    }
}

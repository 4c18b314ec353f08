//! Dice, formulas, and the rollers that evaluate them.
//!
//! Formulas use the host's notation: sums of `NdM` terms and flat numbers,
//! plus keep groups like `{1d20+7,15}kh` for keep-higher re-rolls. A
//! [`DiceRoller`] produces the raw die faces, either from a seeded RNG or
//! from values a player rolled at the table.

pub mod formula;
pub mod lexer;
pub mod pool;
pub mod roll;
pub mod roller;

pub use formula::{Formula, FormulaRoll, Keep, Term};
pub use pool::DicePool;
pub use roll::{DieResult, RollResult};
pub use roller::{DiceRoller, ScriptedRoller, StdRoller};

use serde::{Deserialize, Serialize};

/// A polyhedral die type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Die {
    /// Four-sided die.
    D4,
    /// Six-sided die.
    D6,
    /// Eight-sided die.
    D8,
    /// Ten-sided die.
    D10,
    /// Twelve-sided die.
    D12,
    /// Twenty-sided die.
    D20,
    /// Percentile die (1-100).
    D100,
    /// A die with a custom number of sides.
    Custom(u32),
}

impl Die {
    /// Returns the number of sides on this die.
    pub fn sides(self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
            Self::D20 => 20,
            Self::D100 => 100,
            Self::Custom(n) => n,
        }
    }

    /// The die with `sides` faces, or `None` below two.
    pub fn from_sides(sides: u32) -> Option<Self> {
        match sides {
            0 | 1 => None,
            4 => Some(Self::D4),
            6 => Some(Self::D6),
            8 => Some(Self::D8),
            10 => Some(Self::D10),
            12 => Some(Self::D12),
            20 => Some(Self::D20),
            100 => Some(Self::D100),
            n => Some(Self::Custom(n)),
        }
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn die_sides() {
        assert_eq!(Die::D4.sides(), 4);
        assert_eq!(Die::D12.sides(), 12);
        assert_eq!(Die::D20.sides(), 20);
        assert_eq!(Die::Custom(30).sides(), 30);
    }

    #[test]
    fn die_from_sides() {
        assert_eq!(Die::from_sides(20), Some(Die::D20));
        assert_eq!(Die::from_sides(30), Some(Die::Custom(30)));
        assert_eq!(Die::from_sides(1), None);
    }

    #[test]
    fn die_display() {
        assert_eq!(Die::D20.to_string(), "d20");
        assert_eq!(Die::Custom(30).to_string(), "d30");
    }
}

//! Faces produced by a dice pool.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Die;

/// One die and the face it landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieResult {
    /// The die that was rolled.
    pub die: Die,
    /// The face, from 1 to the die's sides.
    pub value: u32,
}

/// Every face of one pool roll, in roll order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    /// Individual faces.
    pub dice: Vec<DieResult>,
}

impl RollResult {
    /// Sum of the faces, saturating at `u32::MAX`.
    pub fn total(&self) -> u32 {
        self.dice.iter().fold(0u32, |sum, d| sum.saturating_add(d.value))
    }
}

impl fmt::Display for RollResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let faces: Vec<String> = self.dice.iter().map(|d| d.value.to_string()).collect();
        write!(f, "[{}] = {}", faces.join(", "), self.total())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_dice_total_and_display() {
        let result = RollResult {
            dice: [3, 1, 4]
                .into_iter()
                .map(|value| DieResult { die: Die::D4, value })
                .collect(),
        };
        assert_eq!(result.total(), 8);
        assert_eq!(result.to_string(), "[3, 1, 4] = 8");
    }

    #[test]
    fn no_dice_totals_zero() {
        assert_eq!(RollResult::default().total(), 0);
        assert_eq!(RollResult::default().to_string(), "[] = 0");
    }
}

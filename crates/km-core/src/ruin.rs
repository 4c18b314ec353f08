use serde::{Deserialize, Serialize};

use crate::ability::Ability;

/// Threshold a ruin axis starts with.
pub const DEFAULT_RUIN_THRESHOLD: i32 = 10;

keyword_enum! {
    /// One of the four ruin axes.
    pub enum RuinAxis: "ruin" {
        /// Weighs on culture.
        Corruption => "corruption",
        /// Weighs on economy.
        Crime => "crime",
        /// Weighs on stability.
        Decay => "decay",
        /// Weighs on loyalty.
        Strife => "strife",
    }
}

impl RuinAxis {
    /// The ability whose checks this axis penalizes.
    pub fn ability(self) -> Ability {
        match self {
            Self::Corruption => Ability::Culture,
            Self::Crime => Ability::Economy,
            Self::Decay => Ability::Stability,
            Self::Strife => Ability::Loyalty,
        }
    }

    /// The axis that penalizes an ability.
    pub fn for_ability(ability: Ability) -> Self {
        match ability {
            Ability::Culture => Self::Corruption,
            Ability::Economy => Self::Crime,
            Ability::Stability => Self::Decay,
            Ability::Loyalty => Self::Strife,
        }
    }
}

/// The state of one ruin axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuinValues {
    /// Accumulated ruin below the threshold.
    pub value: i32,
    /// Item penalty applied to checks of the axis' ability.
    pub penalty: i32,
    /// Ruin needed to raise the penalty.
    pub threshold: i32,
}

impl Default for RuinValues {
    fn default() -> Self {
        Self {
            value: 0,
            penalty: 0,
            threshold: DEFAULT_RUIN_THRESHOLD,
        }
    }
}

impl RuinValues {
    /// Add (or remove, for negative amounts) ruin.
    ///
    /// Each time the value passes the threshold, the threshold is subtracted
    /// and the penalty goes up by one. The value never drops below zero.
    pub fn add(&mut self, amount: i32) {
        self.value = (self.value + amount).max(0);
        if self.threshold <= 0 {
            return;
        }
        while self.value > self.threshold {
            self.value -= self.threshold;
            self.penalty += 1;
        }
    }
}

/// All four ruin axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ruin {
    /// Corruption.
    pub corruption: RuinValues,
    /// Crime.
    pub crime: RuinValues,
    /// Decay.
    pub decay: RuinValues,
    /// Strife.
    pub strife: RuinValues,
}

impl Ruin {
    /// Values for one axis.
    pub fn get(&self, axis: RuinAxis) -> &RuinValues {
        match axis {
            RuinAxis::Corruption => &self.corruption,
            RuinAxis::Crime => &self.crime,
            RuinAxis::Decay => &self.decay,
            RuinAxis::Strife => &self.strife,
        }
    }

    /// Mutable values for one axis.
    pub fn get_mut(&mut self, axis: RuinAxis) -> &mut RuinValues {
        match axis {
            RuinAxis::Corruption => &mut self.corruption,
            RuinAxis::Crime => &mut self.crime,
            RuinAxis::Decay => &mut self.decay,
            RuinAxis::Strife => &mut self.strife,
        }
    }

    /// Current penalty against checks of an ability.
    pub fn penalty_for(&self, ability: Ability) -> i32 {
        self.get(RuinAxis::for_ability(ability)).penalty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_ability_round_trip() {
        for axis in RuinAxis::ALL {
            assert_eq!(RuinAxis::for_ability(axis.ability()), *axis);
        }
    }

    #[test]
    fn add_below_threshold_keeps_penalty() {
        let mut ruin = RuinValues::default();
        ruin.add(10);
        assert_eq!(ruin.value, 10);
        assert_eq!(ruin.penalty, 0);
    }

    #[test]
    fn add_past_threshold_raises_penalty() {
        let mut ruin = RuinValues::default();
        ruin.add(8);
        ruin.add(5);
        assert_eq!(ruin.value, 3);
        assert_eq!(ruin.penalty, 1);
    }

    #[test]
    fn large_add_raises_penalty_repeatedly() {
        let mut ruin = RuinValues::default();
        ruin.add(25);
        assert_eq!(ruin.value, 5);
        assert_eq!(ruin.penalty, 2);
    }

    #[test]
    fn negative_add_floors_at_zero() {
        let mut ruin = RuinValues::default();
        ruin.add(3);
        ruin.add(-7);
        assert_eq!(ruin.value, 0);
    }

    #[test]
    fn penalty_lookup_by_ability() {
        let mut ruin = Ruin::default();
        ruin.crime.penalty = 2;
        assert_eq!(ruin.penalty_for(Ability::Economy), 2);
        assert_eq!(ruin.penalty_for(Ability::Culture), 0);
    }
}

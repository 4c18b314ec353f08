use serde::{Deserialize, Serialize};

keyword_enum! {
    /// One of the four kingdom ability scores.
    pub enum Ability: "ability" {
        /// Arts, lore, and magic.
        Culture => "culture",
        /// Trade, industry, and exploration.
        Economy => "economy",
        /// Politics, intrigue, and warfare.
        Loyalty => "loyalty",
        /// Agriculture, defense, and engineering.
        Stability => "stability",
    }
}

/// The kingdom's four ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityScores {
    /// Culture score.
    pub culture: i32,
    /// Economy score.
    pub economy: i32,
    /// Loyalty score.
    pub loyalty: i32,
    /// Stability score.
    pub stability: i32,
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self {
            culture: 10,
            economy: 10,
            loyalty: 10,
            stability: 10,
        }
    }
}

impl AbilityScores {
    /// The raw score for an ability.
    pub fn score(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Culture => self.culture,
            Ability::Economy => self.economy,
            Ability::Loyalty => self.loyalty,
            Ability::Stability => self.stability,
        }
    }

    /// Overwrite the score for an ability.
    pub fn set(&mut self, ability: Ability, score: i32) {
        match ability {
            Ability::Culture => self.culture = score,
            Ability::Economy => self.economy = score,
            Ability::Loyalty => self.loyalty = score,
            Ability::Stability => self.stability = score,
        }
    }

    /// The ability modifier derived from the score.
    pub fn modifier(&self, ability: Ability) -> i32 {
        ability_modifier(self.score(ability))
    }
}

/// `floor((score - 10) / 2)`, rounding toward negative infinity.
pub fn ability_modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn modifier_examples() {
        assert_eq!(ability_modifier(10), 0);
        assert_eq!(ability_modifier(11), 0);
        assert_eq!(ability_modifier(18), 4);
        assert_eq!(ability_modifier(7), -2);
        assert_eq!(ability_modifier(8), -1);
        assert_eq!(ability_modifier(9), -1);
    }

    #[test]
    fn defaults_are_ten() {
        let scores = AbilityScores::default();
        for ability in Ability::ALL {
            assert_eq!(scores.score(*ability), 10);
            assert_eq!(scores.modifier(*ability), 0);
        }
    }

    #[test]
    fn set_and_read_back() {
        let mut scores = AbilityScores::default();
        scores.set(Ability::Loyalty, 16);
        assert_eq!(scores.score(Ability::Loyalty), 16);
        assert_eq!(scores.modifier(Ability::Loyalty), 3);
        assert_eq!(scores.score(Ability::Culture), 10);
    }

    #[test]
    fn parse_ability() {
        assert_eq!("Stability".parse::<Ability>().unwrap(), Ability::Stability);
        assert!("charisma".parse::<Ability>().is_err());
    }

    proptest! {
        #[test]
        fn modifier_is_floor_division(score in -50i32..80) {
            let m = ability_modifier(score);
            prop_assert!(m * 2 <= score - 10);
            prop_assert!(score - 10 < m * 2 + 2);
        }
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ability::Ability;

keyword_enum! {
    /// A kingdom skill. Each one is keyed off a single ability.
    pub enum Skill: "skill" {
        /// Stability.
        Agriculture => "agriculture",
        /// Culture.
        Arts => "arts",
        /// Economy.
        Boating => "boating",
        /// Stability.
        Defense => "defense",
        /// Stability.
        Engineering => "engineering",
        /// Economy.
        Exploration => "exploration",
        /// Culture.
        Folklore => "folklore",
        /// Economy.
        Industry => "industry",
        /// Loyalty.
        Intrigue => "intrigue",
        /// Culture.
        Magic => "magic",
        /// Loyalty.
        Politics => "politics",
        /// Culture.
        Scholarship => "scholarship",
        /// Loyalty.
        Statecraft => "statecraft",
        /// Economy.
        Trade => "trade",
        /// Loyalty.
        Warfare => "warfare",
        /// Stability.
        Wilderness => "wilderness",
    }
}

impl Skill {
    /// The ability this skill is keyed off.
    pub fn ability(self) -> Ability {
        match self {
            Self::Agriculture | Self::Defense | Self::Engineering | Self::Wilderness => {
                Ability::Stability
            }
            Self::Arts | Self::Folklore | Self::Magic | Self::Scholarship => Ability::Culture,
            Self::Boating | Self::Exploration | Self::Industry | Self::Trade => Ability::Economy,
            Self::Intrigue | Self::Politics | Self::Statecraft | Self::Warfare => Ability::Loyalty,
        }
    }
}

/// Highest proficiency rank (legendary).
pub const MAX_RANK: u8 = 4;

/// Display label for a proficiency rank.
pub fn rank_label(rank: u8) -> &'static str {
    match rank {
        0 => "Untrained",
        1 => "Trained",
        2 => "Expert",
        3 => "Master",
        _ => "Legendary",
    }
}

/// Proficiency ranks (0-4) for every skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillRanks(BTreeMap<Skill, u8>);

impl Default for SkillRanks {
    fn default() -> Self {
        Self(Skill::ALL.iter().map(|s| (*s, 0)).collect())
    }
}

impl SkillRanks {
    /// The rank for a skill; skills missing from stored data are untrained.
    pub fn rank(&self, skill: Skill) -> u8 {
        self.0.get(&skill).copied().unwrap_or(0)
    }

    /// Set a skill's rank, clamped to legendary.
    pub fn set_rank(&mut self, skill: Skill, rank: u8) {
        self.0.insert(skill, rank.min(MAX_RANK));
    }

    /// Iterate every skill with its rank, in skill order.
    pub fn iter(&self) -> impl Iterator<Item = (Skill, u8)> + '_ {
        Skill::ALL.iter().map(|s| (*s, self.rank(*s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_ability_has_four_skills() {
        for ability in Ability::ALL {
            let count = Skill::ALL.iter().filter(|s| s.ability() == *ability).count();
            assert_eq!(count, 4, "{ability}");
        }
    }

    #[test]
    fn ranks_default_untrained() {
        let ranks = SkillRanks::default();
        assert_eq!(ranks.iter().count(), 16);
        assert!(ranks.iter().all(|(_, r)| r == 0));
    }

    #[test]
    fn set_rank_clamps() {
        let mut ranks = SkillRanks::default();
        ranks.set_rank(Skill::Trade, 9);
        assert_eq!(ranks.rank(Skill::Trade), MAX_RANK);
        assert_eq!(rank_label(ranks.rank(Skill::Trade)), "Legendary");
    }

    #[test]
    fn missing_entries_read_as_untrained() {
        let ranks: SkillRanks = serde_json::from_str(r#"{"arts": 2}"#).unwrap();
        assert_eq!(ranks.rank(Skill::Arts), 2);
        assert_eq!(ranks.rank(Skill::Magic), 0);
    }

    #[test]
    fn serializes_camel_case_keys() {
        let mut ranks = SkillRanks::default();
        ranks.set_rank(Skill::Wilderness, 1);
        let json = serde_json::to_string(&ranks).unwrap();
        assert!(json.contains("\"wilderness\":1"));
    }
}

use serde::{Deserialize, Serialize};

use crate::ability::Ability;

keyword_enum! {
    /// A leadership role on the kingdom's council.
    pub enum Leader: "leader" {
        /// Loyalty. A vacant ruler penalizes every check.
        Ruler => "ruler",
        /// Culture.
        Counselor => "counselor",
        /// Stability.
        General => "general",
        /// Loyalty.
        Emissary => "emissary",
        /// Culture.
        Magister => "magister",
        /// Economy.
        Treasurer => "treasurer",
        /// Economy.
        Viceroy => "viceroy",
        /// Stability.
        Warden => "warden",
    }
}

impl Leader {
    /// The key ability an invested leader in this role boosts.
    pub fn ability(self) -> Ability {
        match self {
            Self::Ruler | Self::Emissary => Ability::Loyalty,
            Self::Counselor | Self::Magister => Ability::Culture,
            Self::General | Self::Warden => Ability::Stability,
            Self::Treasurer | Self::Viceroy => Ability::Economy,
        }
    }
}

keyword_enum! {
    /// Who fills a leadership role.
    #[derive(Default)]
    pub enum LeaderKind: "leader type" {
        /// A player character.
        #[default]
        Pc => "pc",
        /// A non-player character.
        Npc => "npc",
        /// A recruited companion.
        Companion => "companion",
    }
}

/// The state of one leadership role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LeaderValues {
    /// Name of the character filling the role.
    pub name: String,
    /// Whether the leader has been invested with the role's authority.
    pub invested: bool,
    /// PC, NPC, or companion.
    #[serde(rename = "type")]
    pub kind: LeaderKind,
    /// Whether the seat is empty.
    pub vacant: bool,
}

/// All eight leadership roles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Leaders {
    /// Ruler.
    pub ruler: LeaderValues,
    /// Counselor.
    pub counselor: LeaderValues,
    /// General.
    pub general: LeaderValues,
    /// Emissary.
    pub emissary: LeaderValues,
    /// Magister.
    pub magister: LeaderValues,
    /// Treasurer.
    pub treasurer: LeaderValues,
    /// Viceroy.
    pub viceroy: LeaderValues,
    /// Warden.
    pub warden: LeaderValues,
}

impl Leaders {
    /// The values for one role.
    pub fn get(&self, leader: Leader) -> &LeaderValues {
        match leader {
            Leader::Ruler => &self.ruler,
            Leader::Counselor => &self.counselor,
            Leader::General => &self.general,
            Leader::Emissary => &self.emissary,
            Leader::Magister => &self.magister,
            Leader::Treasurer => &self.treasurer,
            Leader::Viceroy => &self.viceroy,
            Leader::Warden => &self.warden,
        }
    }

    /// Mutable values for one role.
    pub fn get_mut(&mut self, leader: Leader) -> &mut LeaderValues {
        match leader {
            Leader::Ruler => &mut self.ruler,
            Leader::Counselor => &mut self.counselor,
            Leader::General => &mut self.general,
            Leader::Emissary => &mut self.emissary,
            Leader::Magister => &mut self.magister,
            Leader::Treasurer => &mut self.treasurer,
            Leader::Viceroy => &mut self.viceroy,
            Leader::Warden => &mut self.warden,
        }
    }

    /// Iterate every role with its values.
    pub fn iter(&self) -> impl Iterator<Item = (Leader, &LeaderValues)> {
        Leader::ALL.iter().map(move |l| (*l, self.get(*l)))
    }

    /// Whether a filled, invested role is keyed off this ability.
    pub fn is_invested(&self, ability: Ability) -> bool {
        self.iter()
            .any(|(role, values)| role.ability() == ability && values.invested && !values.vacant)
    }

    /// Roles whose seat is currently empty.
    pub fn vacancies(&self) -> Vec<Leader> {
        self.iter()
            .filter(|(_, values)| values.vacant)
            .map(|(role, _)| role)
            .collect()
    }
}

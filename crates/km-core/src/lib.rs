//! Core types for Kingmaker Ledger: the kingdom aggregate and everything it owns.
//!
//! This crate defines the persisted data model (abilities, skills, leaders,
//! ruin, double-buffered resources, settlements, active modifiers) and the
//! lookup tables derived from it (level data, size data, control DC). It has
//! no notion of dice or persistence; those live in `km-mechanics` and
//! `km-engine`.

/// Declares a closed set of named variants with a camelCase wire name.
///
/// Generates `ALL`, `as_str`, `label`, `Display`, and a forgiving `FromStr`
/// that accepts `claimHex`, `claim-hex`, and `Claim Hex` alike.
macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            serde::Serialize, serde::Deserialize,
        )]
        $vis enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant, )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The wire name of this variant.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }

            /// Human-readable label, e.g. `Claim Hex`.
            pub fn label(self) -> String {
                crate::names::unslugify(self.as_str())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::error::KmError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = crate::names::normalize(s);
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| crate::names::normalize(v.as_str()) == wanted)
                    .ok_or_else(|| crate::error::KmError::UnknownName {
                        kind: $kind,
                        name: s.to_string(),
                    })
            }
        }
    };
}

/// Kingdom ability scores and the ability modifier formula.
pub mod ability;
/// Kingdom activities, their phases, skills, and DC kinds.
pub mod activity;
/// Golarion (Absalom Reckoning) calendar formatting.
pub mod calendar;
/// Commodities, work sites, fame, and double-buffered pools.
pub mod economy;
/// Error types used throughout the crate.
pub mod error;
/// The kingdom aggregate and its derived tables.
pub mod kingdom;
/// The eight leadership roles.
pub mod leader;
/// Typed bonuses and penalties.
pub mod modifier;
pub mod names;
/// Partial updates merged into a stored kingdom.
pub mod patch;
/// The four ruin axes.
pub mod ruin;
/// Settlements and the structure bonuses supplied by the host.
pub mod settlement;
/// The sixteen kingdom skills and their ranks.
pub mod skill;

pub use ability::{Ability, AbilityScores, ability_modifier};
pub use activity::{Activity, ActivityDc, KingdomPhase};
pub use economy::{
    Buffered, Commodities, Commodity, Consumption, Fame, FameType, MAX_FAME, WorkSite, WorkSiteKind,
    WorkSites,
};
pub use error::{KmError, KmResult};
pub use kingdom::{
    BonusFeat, Feat, Group, Heartland, Kingdom, LevelData, OngoingEvent, Relations, SizeData,
    SizeType, control_dc, event_dc, level_data, size_data,
};
pub use leader::{Leader, LeaderKind, LeaderValues, Leaders};
pub use modifier::{Modifier, ModifierType};
pub use patch::KingdomPatch;
pub use ruin::{Ruin, RuinAxis, RuinValues};
pub use settlement::{
    Settlement, SettlementContext, SettlementType, SkillItemBonus, StructureBonuses,
};
pub use skill::{Skill, SkillRanks, rank_label};

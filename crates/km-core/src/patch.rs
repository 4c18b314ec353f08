use serde::{Deserialize, Serialize};

use crate::ability::AbilityScores;
use crate::activity::Activity;
use crate::economy::{Buffered, Commodities, Consumption, Fame, WorkSites};
use crate::kingdom::{BonusFeat, Feat, Group, Heartland, Kingdom, OngoingEvent};
use crate::leader::Leaders;
use crate::modifier::Modifier;
use crate::ruin::Ruin;
use crate::settlement::Settlement;
use crate::skill::SkillRanks;

macro_rules! kingdom_patch {
    ($( $field:ident : $ty:ty ),+ $(,)?) => {
        /// A partial update of a [`Kingdom`].
        ///
        /// Every field left as `None` keeps its stored value. Saving a patch is
        /// the only way a stored kingdom changes.
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default, rename_all = "camelCase")]
        pub struct KingdomPatch {
            $(
                #[doc = concat!("Replacement for `", stringify!($field), "`.")]
                #[serde(skip_serializing_if = "Option::is_none")]
                pub $field: Option<$ty>,
            )+
        }

        impl KingdomPatch {
            /// Whether the patch changes nothing.
            pub fn is_empty(&self) -> bool {
                [$( self.$field.is_none() ),+].iter().all(|unset| *unset)
            }

            /// Write every set field into `kingdom`.
            pub fn apply(self, kingdom: &mut Kingdom) {
                $(
                    if let Some(value) = self.$field {
                        kingdom.$field = value;
                    }
                )+
            }

            /// Fold a later patch into this one; fields set in `later` win.
            pub fn merge(&mut self, later: KingdomPatch) {
                $(
                    if later.$field.is_some() {
                        self.$field = later.$field;
                    }
                )+
            }

            /// The fields that differ between two kingdoms.
            pub fn diff(before: &Kingdom, after: &Kingdom) -> KingdomPatch {
                KingdomPatch {
                    $(
                        $field: (before.$field != after.$field).then(|| after.$field.clone()),
                    )+
                }
            }
        }
    };
}

kingdom_patch! {
    name: String,
    charter: String,
    government: String,
    heartland: Heartland,
    fame: Fame,
    level: i32,
    xp: i32,
    xp_threshold: i32,
    size: i32,
    unrest: i32,
    at_war: bool,
    resource_points: Buffered<i32>,
    resource_dice: Buffered<i32>,
    commodities: Buffered<Commodities>,
    consumption: Consumption,
    work_sites: WorkSites,
    leaders: Leaders,
    skill_ranks: SkillRanks,
    ability_scores: AbilityScores,
    ruin: Ruin,
    modifiers: Vec<Modifier>,
    ongoing_events: Vec<OngoingEvent>,
    feats: Vec<Feat>,
    bonus_feats: Vec<BonusFeat>,
    settlements: Vec<Settlement>,
    active_settlement: Option<String>,
    groups: Vec<Group>,
    activity_blacklist: Vec<Activity>,
    turns_without_event: i32,
    supernatural_solutions: i32,
    creative_solutions: i32,
    applied_effects: Vec<String>,
}

impl KingdomPatch {
    /// Apply to a copy of `kingdom`.
    pub fn applied_to(self, kingdom: &Kingdom) -> Kingdom {
        let mut next = kingdom.clone();
        self.apply(&mut next);
        next
    }
}

use serde::{Deserialize, Serialize};

use crate::ability::{Ability, AbilityScores};
use crate::activity::Activity;
use crate::economy::{Buffered, Commodities, Consumption, Fame, WorkSites};
use crate::leader::Leaders;
use crate::modifier::Modifier;
use crate::names::normalize;
use crate::ruin::Ruin;
use crate::settlement::{Settlement, SettlementContext};
use crate::skill::SkillRanks;

/// Unrest at which the kingdom falls into anarchy.
pub const ANARCHY_THRESHOLD: i32 = 20;
/// Anarchy threshold with the Endure Anarchy feat.
pub const ENDURE_ANARCHY_THRESHOLD: i32 = 24;
/// Highest kingdom level.
pub const MAX_LEVEL: i32 = 20;
/// XP needed for each level.
pub const XP_THRESHOLD: i32 = 1000;

keyword_enum! {
    /// The terrain of the kingdom's first hex.
    #[derive(Default)]
    pub enum Heartland: "heartland" {
        /// Swamp.
        Swamp => "swamp",
        /// Hills.
        Hills => "hills",
        /// Plains.
        #[default]
        Plains => "plains",
        /// Mountains.
        Mountains => "mountains",
        /// Forest.
        Forest => "forest",
    }
}

/// Values that scale with kingdom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelData {
    /// Claim Hex attempts per region phase.
    pub claim_hex_attempts: i32,
    /// Circumstance bonus on Claim Hex.
    pub claim_hex_circumstance_bonus: i32,
    /// Untyped bonus granted by an invested leader.
    pub invested_leadership_bonus: i32,
    /// Base resource dice collected each turn.
    pub resource_dice: i32,
}

/// Look up the level-scaled values.
pub fn level_data(level: i32) -> LevelData {
    LevelData {
        claim_hex_attempts: if level < 4 {
            1
        } else if level < 9 {
            2
        } else {
            3
        },
        claim_hex_circumstance_bonus: if level < 4 { 0 } else { 2 },
        invested_leadership_bonus: if level < 8 {
            1
        } else if level < 16 {
            2
        } else {
            3
        },
        resource_dice: level + 4,
    }
}

keyword_enum! {
    /// Size category of the kingdom.
    pub enum SizeType: "size" {
        /// Fewer than 10 hexes.
        Territory => "territory",
        /// Fewer than 25 hexes.
        Province => "province",
        /// Fewer than 50 hexes.
        State => "state",
        /// Fewer than 100 hexes.
        Country => "country",
        /// 100 hexes or more.
        Dominion => "dominion",
    }
}

/// Values that scale with the number of claimed hexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeData {
    /// Size category.
    #[serde(rename = "type")]
    pub kind: SizeType,
    /// Faces of the resource die.
    pub resource_die_size: u32,
    /// Added to the control DC.
    pub control_dc_modifier: i32,
    /// Base storage for each commodity.
    pub commodity_storage: i32,
}

impl SizeData {
    /// The resource die in dice notation, e.g. `d6`.
    pub fn resource_die(&self) -> String {
        format!("d{}", self.resource_die_size)
    }
}

/// Look up the size-scaled values.
pub fn size_data(size: i32) -> SizeData {
    let (kind, die, dc, storage) = if size < 10 {
        (SizeType::Territory, 4, 0, 4)
    } else if size < 25 {
        (SizeType::Province, 6, 1, 8)
    } else if size < 50 {
        (SizeType::State, 8, 2, 12)
    } else if size < 100 {
        (SizeType::Country, 10, 3, 16)
    } else {
        (SizeType::Dominion, 12, 4, 20)
    };
    SizeData {
        kind,
        resource_die_size: die,
        control_dc_modifier: dc,
        commodity_storage: storage,
    }
}

/// The DC of most kingdom checks.
pub fn control_dc(level: i32, size: i32, ruler_vacant: bool) -> i32 {
    let adjusted = if level < 5 { level - 1 } else { level };
    let vacancy = if ruler_vacant { 2 } else { 0 };
    14 + adjusted + adjusted.div_euclid(3) + size_data(size).control_dc_modifier + vacancy
}

/// Flat check DC for a kingdom event; it drops by 5 every turn without one.
pub fn event_dc(turns_without_event: i32) -> i32 {
    (16 - 5 * turns_without_event).max(1)
}

/// A kingdom feat taken at some level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feat {
    /// Feat identifier.
    pub id: String,
    /// Level the feat was taken at.
    pub level: i32,
}

/// A feat granted outside the regular progression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusFeat {
    /// Feat identifier.
    pub id: String,
}

/// An event that lasts several turns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OngoingEvent {
    /// Event name.
    pub name: String,
}

keyword_enum! {
    /// Relations with a neighboring group.
    #[derive(Default)]
    pub enum Relations: "relations" {
        /// No relations.
        #[default]
        None => "none",
        /// Diplomatic relations.
        Diplomatic => "diplomatic",
        /// An established trade agreement.
        TradeAgreement => "trade-agreement",
    }
}

/// A neighboring nation or faction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Group name.
    pub name: String,
    /// DC to negotiate with the group.
    #[serde(rename = "negotiationDC")]
    pub negotiation_dc: i32,
    /// Whether the kingdom is at war with the group.
    #[serde(default)]
    pub at_war: bool,
    /// Current relations.
    #[serde(default)]
    pub relations: Relations,
}

/// The kingdom aggregate as persisted by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Kingdom {
    /// Kingdom name.
    pub name: String,
    /// Charter.
    pub charter: String,
    /// Government.
    pub government: String,
    /// Heartland terrain.
    pub heartland: Heartland,
    /// Fame or infamy.
    pub fame: Fame,
    /// Kingdom level, 1 to 20.
    pub level: i32,
    /// Experience points.
    pub xp: i32,
    /// XP needed to level up.
    pub xp_threshold: i32,
    /// Claimed hexes.
    pub size: i32,
    /// Unrest.
    pub unrest: i32,
    /// Whether the kingdom is at war.
    pub at_war: bool,
    /// Resource points.
    pub resource_points: Buffered<i32>,
    /// Bonus resource dice.
    pub resource_dice: Buffered<i32>,
    /// Stockpiled commodities.
    pub commodities: Buffered<Commodities>,
    /// Extra food consumption.
    pub consumption: Consumption,
    /// Work sites.
    pub work_sites: WorkSites,
    /// Leadership roles.
    pub leaders: Leaders,
    /// Skill proficiency ranks.
    pub skill_ranks: SkillRanks,
    /// Ability scores.
    pub ability_scores: AbilityScores,
    /// Ruin axes.
    pub ruin: Ruin,
    /// Active modifiers.
    pub modifiers: Vec<Modifier>,
    /// Events still in progress.
    pub ongoing_events: Vec<OngoingEvent>,
    /// Feats.
    pub feats: Vec<Feat>,
    /// Bonus feats.
    pub bonus_feats: Vec<BonusFeat>,
    /// Settlements.
    pub settlements: Vec<Settlement>,
    /// Scene id of the settlement the leaders currently act from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_settlement: Option<String>,
    /// Neighboring groups.
    pub groups: Vec<Group>,
    /// Activities the game master disabled.
    pub activity_blacklist: Vec<Activity>,
    /// Turns since the last kingdom event.
    pub turns_without_event: i32,
    /// Banked supernatural solutions.
    pub supernatural_solutions: i32,
    /// Banked creative solutions.
    pub creative_solutions: i32,
    /// Single-use activity effects already applied.
    pub applied_effects: Vec<String>,
}

impl Default for Kingdom {
    fn default() -> Self {
        Self {
            name: String::new(),
            charter: String::new(),
            government: String::new(),
            heartland: Heartland::default(),
            fame: Fame::default(),
            level: 1,
            xp: 0,
            xp_threshold: XP_THRESHOLD,
            size: 0,
            unrest: 0,
            at_war: false,
            resource_points: Buffered::default(),
            resource_dice: Buffered::default(),
            commodities: Buffered::default(),
            consumption: Consumption::default(),
            work_sites: WorkSites::default(),
            leaders: Leaders::default(),
            skill_ranks: SkillRanks::default(),
            ability_scores: AbilityScores::default(),
            ruin: Ruin::default(),
            modifiers: Vec::new(),
            ongoing_events: Vec::new(),
            feats: Vec::new(),
            bonus_feats: Vec::new(),
            settlements: Vec::new(),
            active_settlement: None,
            groups: Vec::new(),
            activity_blacklist: Vec::new(),
            turns_without_event: 0,
            supernatural_solutions: 0,
            creative_solutions: 0,
            applied_effects: Vec::new(),
        }
    }
}

impl Kingdom {
    /// Level-scaled values.
    pub fn level_data(&self) -> LevelData {
        level_data(self.level)
    }

    /// Size-scaled values.
    pub fn size_data(&self) -> SizeData {
        size_data(self.size)
    }

    /// Control DC, including the penalty for a vacant ruler.
    pub fn control_dc(&self) -> i32 {
        control_dc(self.level, self.size, self.leaders.ruler.vacant)
    }

    /// DC of the next event check.
    pub fn event_dc(&self) -> i32 {
        event_dc(self.turns_without_event)
    }

    /// Whether the kingdom has a feat or bonus feat, matched by name.
    pub fn has_feat(&self, id: &str) -> bool {
        let wanted = normalize(id);
        self.feats.iter().any(|f| normalize(&f.id) == wanted)
            || self.bonus_feats.iter().any(|f| normalize(&f.id) == wanted)
    }

    /// Unrest at which the kingdom falls into anarchy.
    pub fn anarchy_threshold(&self) -> i32 {
        if self.has_feat("Endure Anarchy") {
            ENDURE_ANARCHY_THRESHOLD
        } else {
            ANARCHY_THRESHOLD
        }
    }

    /// Whether unrest has reached the anarchy threshold.
    pub fn in_anarchy(&self) -> bool {
        self.unrest >= self.anarchy_threshold()
    }

    /// Storage ceiling for each commodity.
    pub fn commodity_capacity(&self, ctx: &SettlementContext) -> Commodities {
        Commodities::splat(self.size_data().commodity_storage).plus(&ctx.storage(&self.settlements))
    }

    /// Food the kingdom has to pay this turn.
    pub fn total_consumption(&self, ctx: &SettlementContext) -> i32 {
        let settlements: i32 = self.settlements.iter().map(Settlement::consumption).sum();
        let total = self.consumption.armies + self.consumption.now + settlements
            - self.work_sites.farmland_count()
            - ctx.consumption_reduction(&self.settlements);
        total.max(0)
    }

    /// Groups the kingdom holds a trade agreement with.
    pub fn trade_agreements(&self) -> usize {
        self.groups
            .iter()
            .filter(|g| g.relations == Relations::TradeAgreement)
            .count()
    }

    /// Whether an activity may be attempted right now.
    pub fn activity_available(&self, activity: Activity, ctx: &SettlementContext) -> bool {
        if self.activity_blacklist.contains(&activity) {
            return false;
        }
        !activity.requires_unlock()
            || ctx.unlocked_activities(&self.settlements).contains(&activity)
    }

    /// The settlement the leaders act from.
    pub fn active_settlement(&self) -> Option<&Settlement> {
        let id = self.active_settlement.as_deref()?;
        self.settlements.iter().find(|s| s.scene_id == id)
    }

    /// Whether a role tied to `ability` is filled by an invested leader.
    pub fn is_invested(&self, ability: Ability) -> bool {
        self.leaders.is_invested(ability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settlement::StructureBonuses;

    #[test]
    fn level_data_breakpoints() {
        assert_eq!(level_data(1).claim_hex_attempts, 1);
        assert_eq!(level_data(4).claim_hex_attempts, 2);
        assert_eq!(level_data(9).claim_hex_attempts, 3);
        assert_eq!(level_data(3).claim_hex_circumstance_bonus, 0);
        assert_eq!(level_data(4).claim_hex_circumstance_bonus, 2);
        assert_eq!(level_data(7).invested_leadership_bonus, 1);
        assert_eq!(level_data(8).invested_leadership_bonus, 2);
        assert_eq!(level_data(16).invested_leadership_bonus, 3);
        assert_eq!(level_data(5).resource_dice, 9);
    }

    #[test]
    fn size_data_breakpoints() {
        assert_eq!(size_data(9).kind, SizeType::Territory);
        assert_eq!(size_data(10).kind, SizeType::Province);
        assert_eq!(size_data(49).resource_die(), "d8");
        assert_eq!(size_data(100).commodity_storage, 20);
    }

    #[test]
    fn control_dc_formula() {
        assert_eq!(control_dc(1, 0, false), 14);
        assert_eq!(control_dc(4, 0, false), 18);
        assert_eq!(control_dc(5, 0, false), 20);
        assert_eq!(control_dc(6, 30, false), 24);
        assert_eq!(control_dc(1, 0, true), 16);
    }

    #[test]
    fn event_dc_floors_at_one() {
        assert_eq!(event_dc(0), 16);
        assert_eq!(event_dc(1), 11);
        assert_eq!(event_dc(3), 1);
        assert_eq!(event_dc(10), 1);
    }

    #[test]
    fn anarchy_threshold_with_feat() {
        let mut kingdom = Kingdom::default();
        assert_eq!(kingdom.anarchy_threshold(), 20);
        kingdom.bonus_feats.push(BonusFeat {
            id: "endure-anarchy".into(),
        });
        assert_eq!(kingdom.anarchy_threshold(), 24);
    }

    #[test]
    fn consumption_is_never_negative() {
        let mut kingdom = Kingdom::default();
        kingdom.work_sites.farmlands.quantity = 3;
        kingdom.consumption.armies = 1;
        assert_eq!(kingdom.total_consumption(&SettlementContext::default()), 0);

        kingdom.settlements.push(Settlement {
            scene_id: "a".into(),
            level: 5,
            ..Settlement::default()
        });
        assert_eq!(kingdom.total_consumption(&SettlementContext::default()), 2);
    }

    #[test]
    fn capacity_includes_structures() {
        let mut kingdom = Kingdom::default();
        kingdom.settlements.push(Settlement {
            scene_id: "a".into(),
            level: 1,
            ..Settlement::default()
        });
        let mut ctx = SettlementContext::default();
        ctx.structures.insert(
            "a".into(),
            StructureBonuses {
                storage: Commodities {
                    lumber: 2,
                    ..Commodities::default()
                },
                ..StructureBonuses::default()
            },
        );
        let capacity = kingdom.commodity_capacity(&ctx);
        assert_eq!(capacity.lumber, 6);
        assert_eq!(capacity.food, 4);
    }

    #[test]
    fn unlock_and_blacklist_gate_activities() {
        let mut kingdom = Kingdom::default();
        let ctx = SettlementContext::default();
        assert!(kingdom.activity_available(Activity::ClaimHex, &ctx));
        assert!(!kingdom.activity_available(Activity::Prognostication, &ctx));
        kingdom.activity_blacklist.push(Activity::ClaimHex);
        assert!(!kingdom.activity_available(Activity::ClaimHex, &ctx));
    }

    #[test]
    fn empty_blob_is_default_kingdom() {
        let kingdom: Kingdom = serde_json::from_str("{}").unwrap();
        assert_eq!(kingdom, Kingdom::default());
        assert_eq!(kingdom.level, 1);
        assert_eq!(kingdom.ability_scores.culture, 10);
    }

    #[test]
    fn wire_names_are_camel_case() {
        let json = serde_json::to_value(Kingdom::default()).unwrap();
        assert!(json.get("xpThreshold").is_some());
        assert!(json.get("turnsWithoutEvent").is_some());
        assert!(json.get("resourcePoints").unwrap().get("next").is_some());
    }
}

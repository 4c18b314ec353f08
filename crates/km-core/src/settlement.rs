use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::activity::Activity;
use crate::economy::Commodities;
use crate::error::{KmError, KmResult};
use crate::skill::Skill;

keyword_enum! {
    /// Whether a settlement is the capital.
    #[derive(Default)]
    pub enum SettlementType: "settlement type" {
        /// The capital; its structures count for every settlement.
        Capital => "capital",
        /// Any other settlement.
        #[default]
        Settlement => "settlement",
    }
}

/// A settlement, referenced by the id of the scene it is mapped on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settlement {
    /// Scene holding the settlement map.
    pub scene_id: String,
    /// Settlement level.
    pub level: i32,
    /// Capital or ordinary settlement.
    #[serde(rename = "type")]
    pub kind: SettlementType,
    /// Occupied lots.
    pub lots: i32,
    /// Lies outside the kingdom's core territory.
    pub secondary_territory: bool,
    /// Borders water on every side.
    pub water_borders: bool,
}

impl Settlement {
    /// Food eaten each turn, by settlement size.
    pub fn consumption(&self) -> i32 {
        match self.level {
            i32::MIN..=0 => 0,
            1 => 1,
            2..=4 => 2,
            5..=9 => 4,
            _ => 6,
        }
    }

    /// Village, town, city or metropolis.
    pub fn size_label(&self) -> &'static str {
        match self.level {
            i32::MIN..=1 => "Village",
            2..=4 => "Town",
            5..=9 => "City",
            _ => "Metropolis",
        }
    }
}

/// An item bonus a structure grants to one skill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillItemBonus {
    /// Bonus value.
    pub value: i32,
    /// The bonus only applies to these activities; empty means any check.
    pub activities: Vec<Activity>,
}

impl SkillItemBonus {
    /// Whether the bonus applies to a check for `activity`.
    pub fn applies_to(&self, activity: Option<Activity>) -> bool {
        self.activities.is_empty() || activity.is_some_and(|a| self.activities.contains(&a))
    }
}

/// The aggregated structure bonuses of one settlement, as evaluated by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct StructureBonuses {
    /// Item bonuses per skill.
    pub skill_bonuses: BTreeMap<Skill, SkillItemBonus>,
    /// Extra commodity storage.
    pub storage: Commodities,
    /// Activities unlocked by the settlement's structures.
    pub unlocked_activities: BTreeSet<Activity>,
    /// Lots holding residential structures.
    pub residential_lots: i32,
    /// Reduction of the kingdom's food consumption.
    pub consumption_reduction: i32,
}

impl StructureBonuses {
    /// Parse the bonuses of the settlement named `name`.
    pub fn from_json(name: &str, json: &str) -> KmResult<Self> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| malformed(name, e.to_string()))?;
        Self::from_value(name, value)
    }

    /// Parse from an already decoded JSON value.
    pub fn from_value(name: &str, value: serde_json::Value) -> KmResult<Self> {
        let bonuses: Self =
            serde_json::from_value(value).map_err(|e| malformed(name, e.to_string()))?;
        if bonuses.skill_bonuses.values().any(|b| b.value < 0) {
            return Err(malformed(name, "skill bonuses must not be negative"));
        }
        if bonuses.storage.iter().any(|(_, v)| v < 0) {
            return Err(malformed(name, "storage must not be negative"));
        }
        if bonuses.residential_lots < 0 || bonuses.consumption_reduction < 0 {
            return Err(malformed(name, "lot and consumption counts must not be negative"));
        }
        Ok(bonuses)
    }
}

fn malformed(name: &str, reason: impl Into<String>) -> KmError {
    KmError::MalformedStructure {
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// Structure bonuses for each settlement, keyed by scene id.
///
/// This is what the host's structure evaluation hands to the rules engine.
/// Settlements of the kingdom with no entry count as having no structures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettlementContext {
    /// Bonuses per scene id.
    pub structures: BTreeMap<String, StructureBonuses>,
}

impl SettlementContext {
    /// Parse a JSON object mapping scene ids to structure bonuses.
    pub fn from_json(json: &str) -> KmResult<Self> {
        let raw: BTreeMap<String, serde_json::Value> =
            serde_json::from_str(json).map_err(|e| malformed("context", e.to_string()))?;
        let mut structures = BTreeMap::new();
        for (scene_id, value) in raw {
            let bonuses = StructureBonuses::from_value(&scene_id, value)?;
            structures.insert(scene_id, bonuses);
        }
        Ok(Self { structures })
    }

    /// Bonuses of one settlement.
    pub fn bonuses(&self, scene_id: &str) -> Option<&StructureBonuses> {
        self.structures.get(scene_id)
    }

    /// Extra storage summed over the given settlements.
    pub fn storage(&self, settlements: &[Settlement]) -> Commodities {
        settlements
            .iter()
            .filter_map(|s| self.bonuses(&s.scene_id))
            .fold(Commodities::default(), |acc, b| acc.plus(&b.storage))
    }

    /// Consumption reduction summed over the given settlements.
    pub fn consumption_reduction(&self, settlements: &[Settlement]) -> i32 {
        settlements
            .iter()
            .filter_map(|s| self.bonuses(&s.scene_id))
            .map(|b| b.consumption_reduction)
            .sum()
    }

    /// Settlements with more occupied lots than residential lots.
    pub fn overcrowded(&self, settlements: &[Settlement]) -> usize {
        settlements
            .iter()
            .filter(|s| {
                let residential = self.bonuses(&s.scene_id).map_or(0, |b| b.residential_lots);
                s.lots > residential
            })
            .count()
    }

    /// Activities unlocked by any of the given settlements.
    pub fn unlocked_activities(&self, settlements: &[Settlement]) -> BTreeSet<Activity> {
        settlements
            .iter()
            .filter_map(|s| self.bonuses(&s.scene_id))
            .flat_map(|b| b.unlocked_activities.iter().copied())
            .collect()
    }

    /// The item bonus the active settlement grants to a check.
    ///
    /// Capital structures count for every settlement, so the higher of the
    /// active settlement's and the capital's bonus applies.
    pub fn skill_bonus(
        &self,
        settlements: &[Settlement],
        active: Option<&str>,
        skill: Skill,
        activity: Option<Activity>,
    ) -> Option<SkillItemBonus> {
        let active = active?;
        let capital = settlements
            .iter()
            .find(|s| s.kind == SettlementType::Capital)
            .map(|s| s.scene_id.as_str());
        let mut scenes = vec![active];
        if let Some(capital) = capital.filter(|c| *c != active) {
            scenes.push(capital);
        }
        scenes
            .into_iter()
            .filter_map(|id| self.bonuses(id))
            .filter_map(|b| b.skill_bonuses.get(&skill))
            .filter(|b| b.applies_to(activity) && b.value > 0)
            .max_by_key(|b| b.value)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settlement(id: &str, level: i32, lots: i32) -> Settlement {
        Settlement {
            scene_id: id.to_string(),
            level,
            lots,
            ..Settlement::default()
        }
    }

    #[test]
    fn consumption_by_level() {
        let levels = [(0, 0), (1, 1), (2, 2), (4, 2), (5, 4), (9, 4), (10, 6), (20, 6)];
        for (level, expected) in levels {
            assert_eq!(settlement("a", level, 0).consumption(), expected, "level {level}");
        }
    }

    #[test]
    fn malformed_payload_is_distinct_error() {
        let err = StructureBonuses::from_json("Town Hall", r#"{"skillBonuses": 3}"#).unwrap_err();
        assert!(matches!(err, KmError::MalformedStructure { ref name, .. } if name == "Town Hall"));

        let err = StructureBonuses::from_json("Inn", r#"{"storage": {"food": -1}}"#).unwrap_err();
        assert!(matches!(err, KmError::MalformedStructure { .. }));
    }

    #[test]
    fn context_aggregates_kingdom_settlements() {
        let ctx = SettlementContext::from_json(
            r#"{
                "a": {"storage": {"food": 2}, "residentialLots": 1, "consumptionReduction": 1},
                "b": {"storage": {"food": 1, "ore": 3}, "unlockedActivities": ["prognostication"]},
                "unused": {"storage": {"food": 50}}
            }"#,
        )
        .unwrap();
        let settlements = [settlement("a", 1, 1), settlement("b", 3, 2)];
        let storage = ctx.storage(&settlements);
        assert_eq!(storage.food, 3);
        assert_eq!(storage.ore, 3);
        assert_eq!(ctx.consumption_reduction(&settlements), 1);
        assert_eq!(ctx.overcrowded(&settlements), 1);
        assert!(ctx.unlocked_activities(&settlements).contains(&Activity::Prognostication));
    }

    #[test]
    fn skill_bonus_respects_activity_and_capital() {
        let ctx = SettlementContext::from_json(
            r#"{
                "town": {"skillBonuses": {"trade": {"value": 1, "activities": ["collectTaxes"]}}},
                "capital": {"skillBonuses": {"trade": {"value": 2, "activities": ["tradeCommodities"]}}}
            }"#,
        )
        .unwrap();
        let mut capital = settlement("capital", 5, 0);
        capital.kind = SettlementType::Capital;
        let settlements = [settlement("town", 2, 0), capital];

        let taxes = ctx.skill_bonus(
            &settlements,
            Some("town"),
            Skill::Trade,
            Some(Activity::CollectTaxes),
        );
        assert_eq!(taxes.map(|b| b.value), Some(1));

        let trade = ctx.skill_bonus(
            &settlements,
            Some("town"),
            Skill::Trade,
            Some(Activity::TradeCommodities),
        );
        assert_eq!(trade.map(|b| b.value), Some(2));

        assert!(ctx.skill_bonus(&settlements, Some("town"), Skill::Trade, None).is_none());
        assert!(ctx.skill_bonus(&settlements, None, Skill::Trade, None).is_none());
    }
}

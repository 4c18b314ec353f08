use serde::{Deserialize, Serialize};

use crate::ability::Ability;
use crate::activity::{Activity, KingdomPhase};
use crate::skill::Skill;

keyword_enum! {
    /// Stacking category of a modifier.
    pub enum ModifierType: "modifier type" {
        /// From the key ability score.
        Ability => "ability",
        /// From the skill's proficiency rank.
        Proficiency => "proficiency",
        /// From structures, and the ruin penalty.
        Item => "item",
        /// Situational status effects, including unrest and vacancies.
        Status => "status",
        /// Circumstance bonuses and penalties from activities and events.
        Circumstance => "circumstance",
        /// Always stacks.
        Untyped => "untyped",
    }
}

/// A single bonus or penalty to kingdom checks.
///
/// Filters (`abilities`, `skills`, `phases`, `activities`) narrow where the
/// modifier applies. Ability and skill filters decide whether it appears in
/// a check at all; phase and activity filters leave it visible but disabled
/// so it can be toggled on by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Modifier {
    /// Display name.
    pub name: String,
    /// Stacking category.
    #[serde(rename = "type")]
    pub kind: ModifierType,
    /// Positive for a bonus, negative for a penalty.
    pub value: i32,
    /// Whether the modifier counts toward totals.
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    /// Remaining turns; `None` lasts until removed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turns: Option<u32>,
    /// Single-use token. A modifier carrying one is removed once it was
    /// used in a check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consume_id: Option<String>,
    /// Only applies to checks keyed off these abilities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abilities: Option<Vec<Ability>>,
    /// Only applies to these skills.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<Skill>>,
    /// Only enabled during these phases.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phases: Option<Vec<KingdomPhase>>,
    /// Only enabled for these activities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activities: Option<Vec<Activity>>,
    /// A free-form adjustment entered by hand; always stacks.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub custom: bool,
}

fn enabled_default() -> bool {
    true
}

impl Modifier {
    /// An enabled, permanent modifier with no filters.
    pub fn new(name: impl Into<String>, kind: ModifierType, value: i32) -> Self {
        Self {
            name: name.into(),
            kind,
            value,
            enabled: true,
            turns: None,
            consume_id: None,
            abilities: None,
            skills: None,
            phases: None,
            activities: None,
            custom: false,
        }
    }

    /// A hand-entered adjustment.
    pub fn custom(kind: ModifierType, value: i32) -> Self {
        Self {
            custom: true,
            ..Self::new("Custom", kind, value)
        }
    }

    /// Expire after `turns` turns.
    pub fn with_turns(mut self, turns: u32) -> Self {
        self.turns = Some(turns);
        self
    }

    /// Mark as single use.
    pub fn with_consume_id(mut self, id: impl Into<String>) -> Self {
        self.consume_id = Some(id.into());
        self
    }

    /// Restrict to checks keyed off the given abilities.
    pub fn for_abilities(mut self, abilities: &[Ability]) -> Self {
        self.abilities = Some(abilities.to_vec());
        self
    }

    /// Restrict to the given skills.
    pub fn for_skills(mut self, skills: &[Skill]) -> Self {
        self.skills = Some(skills.to_vec());
        self
    }

    /// Restrict to the given phases.
    pub fn in_phases(mut self, phases: &[KingdomPhase]) -> Self {
        self.phases = Some(phases.to_vec());
        self
    }

    /// Restrict to the given activities.
    pub fn for_activities(mut self, activities: &[Activity]) -> Self {
        self.activities = Some(activities.to_vec());
        self
    }

    /// Whether the modifier belongs in a check of `skill`.
    pub fn applies_to(&self, skill: Skill) -> bool {
        let ability_ok = self
            .abilities
            .as_ref()
            .is_none_or(|a| a.contains(&skill.ability()));
        let skill_ok = self.skills.as_ref().is_none_or(|s| s.contains(&skill));
        ability_ok && skill_ok
    }

    /// Whether the phase and activity filters allow the modifier.
    pub fn active_in(&self, phase: Option<KingdomPhase>, activity: Option<Activity>) -> bool {
        let phase_ok = match (&self.phases, phase) {
            (None, _) => true,
            (Some(phases), Some(p)) => phases.contains(&p),
            (Some(_), None) => false,
        };
        let activity_ok = match (&self.activities, activity) {
            (None, _) => true,
            (Some(activities), Some(a)) => activities.contains(&a),
            (Some(_), None) => false,
        };
        phase_ok && activity_ok
    }

    /// The modifier as it stands after one more turn, or `None` if it expires.
    pub fn tick(&self) -> Option<Modifier> {
        match self.turns {
            None => Some(self.clone()),
            Some(turns) if turns <= 1 => None,
            Some(turns) => Some(Modifier {
                turns: Some(turns - 1),
                ..self.clone()
            }),
        }
    }

    /// Short description, e.g. `Refuge +2 (circumstance)`.
    pub fn label(&self) -> String {
        let mut out = format!("{} {:+} ({})", self.name, self.value, self.kind);
        if let Some(turns) = self.turns {
            let unit = if turns == 1 { "turn" } else { "turns" };
            out.push_str(&format!(", {turns} {unit}"));
        }
        out
    }
}

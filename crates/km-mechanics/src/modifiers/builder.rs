//! The modifier list of a kingdom skill check.

use std::collections::{BTreeMap, HashMap};

use km_core::names::slugify;
use km_core::{
    Ability, AbilityScores, Activity, Kingdom, KingdomPhase, Leader, Leaders, Modifier,
    ModifierType, Ruin, RuinAxis, Skill, SkillItemBonus, level_data, rank_label,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Unrest tiers: each threshold reached adds one point of status penalty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnrestScale {
    thresholds: Vec<i32>,
}

impl Default for UnrestScale {
    fn default() -> Self {
        Self {
            thresholds: vec![1, 5, 10, 15],
        }
    }
}

impl UnrestScale {
    /// A scale with custom thresholds; they are sorted and zero or negative
    /// entries are dropped.
    pub fn new(mut thresholds: Vec<i32>) -> Self {
        thresholds.retain(|t| *t > 0);
        thresholds.sort_unstable();
        Self { thresholds }
    }

    /// The thresholds, lowest first.
    pub fn thresholds(&self) -> &[i32] {
        &self.thresholds
    }

    /// Status penalty (as a positive number) for an unrest value.
    pub fn penalty(&self, unrest: i32) -> i32 {
        self.thresholds.iter().filter(|t| unrest >= **t).count() as i32
    }
}

/// A modifier with the stable id the check dialog refers to it by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierWithId {
    /// Stable id, e.g. `vacancy-ruler-status`.
    pub id: String,
    /// The modifier, with `enabled` already resolved.
    #[serde(flatten)]
    pub modifier: Modifier,
    /// Forced state, when the user toggled the modifier by hand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overridden: Option<bool>,
}

/// The `ability`-typed modifier from an ability score.
pub fn create_ability_modifier(ability: Ability, scores: &AbilityScores) -> Modifier {
    Modifier::new(ability.label(), ModifierType::Ability, scores.modifier(ability))
}

/// Twice the rank, plus the kingdom level once trained or when the
/// always-add-level option is on.
pub fn create_proficiency_modifier(rank: u8, always_add_level: bool, level: i32) -> Modifier {
    let rank_value = i32::from(rank) * 2;
    let level_value = if rank > 0 || always_add_level { level } else { 0 };
    Modifier::new(rank_label(rank), ModifierType::Proficiency, rank_value + level_value)
}

/// Status penalties for empty leadership seats.
///
/// Ability- and phase-bound penalties carry filters; `process_modifiers`
/// drops or disables them for checks they do not touch.
pub fn create_vacancy_modifiers(leaders: &Leaders) -> Vec<Modifier> {
    leaders
        .vacancies()
        .into_iter()
        .map(|leader| {
            let name = format!("Vacancy: {}", leader.label());
            match leader {
                Leader::Ruler => Modifier::new(name, ModifierType::Status, -1),
                Leader::Counselor | Leader::Emissary | Leader::Treasurer | Leader::Viceroy => {
                    let ability = match leader {
                        Leader::Counselor => Ability::Culture,
                        Leader::Emissary => Ability::Loyalty,
                        Leader::Treasurer => Ability::Economy,
                        _ => Ability::Stability,
                    };
                    Modifier::new(name, ModifierType::Status, -1).for_abilities(&[ability])
                }
                Leader::General | Leader::Magister => {
                    Modifier::new(name, ModifierType::Status, -4).in_phases(&[KingdomPhase::Army])
                }
                Leader::Warden => {
                    Modifier::new(name, ModifierType::Status, -4).in_phases(&[KingdomPhase::Region])
                }
            }
        })
        .collect()
}

/// Untyped bonus for an invested leader whose role is keyed off `ability`.
pub fn create_invested_modifier(level: i32, ability: Ability, leaders: &Leaders) -> Option<Modifier> {
    leaders.is_invested(ability).then(|| {
        Modifier::new(
            "Invested Leader",
            ModifierType::Untyped,
            level_data(level).invested_leadership_bonus,
        )
    })
}

/// Item penalty from the ruin axis that weighs on `ability`.
pub fn create_ruin_modifier(ability: Ability, ruin: &Ruin) -> Option<Modifier> {
    let axis = RuinAxis::for_ability(ability);
    let penalty = ruin.get(axis).penalty;
    (penalty != 0).then(|| {
        Modifier::new(format!("Ruin: {}", axis.label()), ModifierType::Item, -penalty)
    })
}

/// Status penalty from unrest; none at zero unrest.
pub fn create_unrest_modifier(unrest: i32, scale: &UnrestScale) -> Option<Modifier> {
    let penalty = scale.penalty(unrest);
    (penalty > 0).then(|| Modifier::new("Unrest", ModifierType::Status, -penalty))
}

/// Item bonus granted by the active settlement's structures.
pub fn create_structure_modifier(bonus: &SkillItemBonus) -> Modifier {
    let modifier = Modifier::new("Structure", ModifierType::Item, bonus.value);
    if bonus.activities.is_empty() {
        modifier
    } else {
        modifier.for_activities(&bonus.activities)
    }
}

/// Assign ids and resolve `enabled` for one check.
///
/// Modifiers not meant for `skill` are dropped. Those outside the phase or
/// activity stay in the list disabled. An entry in `overrides` forces the
/// state of the modifier with that id.
pub fn process_modifiers(
    modifiers: Vec<Modifier>,
    skill: Skill,
    phase: Option<KingdomPhase>,
    activity: Option<Activity>,
    overrides: &BTreeMap<String, bool>,
) -> Vec<ModifierWithId> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    modifiers
        .into_iter()
        .filter(|m| m.applies_to(skill))
        .map(|mut modifier| {
            let base = format!("{}-{}", slugify(&modifier.name), modifier.kind);
            let count = seen.entry(base.clone()).or_insert(0);
            *count += 1;
            let id = if *count == 1 {
                base
            } else {
                format!("{base}-{count}")
            };
            modifier.enabled = modifier.enabled && modifier.active_in(phase, activity);
            let overridden = overrides.get(&id).copied();
            if let Some(state) = overridden {
                modifier.enabled = state;
            }
            ModifierWithId {
                id,
                modifier,
                overridden,
            }
        })
        .collect()
}

/// Everything the modifier list of one skill check depends on.
#[derive(Debug, Clone)]
pub struct SkillModifiers {
    /// The skill being checked.
    pub skill: Skill,
    /// Proficiency rank in the skill.
    pub rank: u8,
    /// Ability scores.
    pub ability_scores: AbilityScores,
    /// Kingdom level.
    pub level: i32,
    /// Ruin axes.
    pub ruin: Ruin,
    /// Unrest.
    pub unrest: i32,
    /// Leadership roles.
    pub leaders: Leaders,
    /// Add the level to untrained skills too.
    pub always_add_level: bool,
    /// Unrest tiers.
    pub unrest_scale: UnrestScale,
    /// Structure item bonus of the active settlement.
    pub skill_item_bonus: Option<SkillItemBonus>,
    /// The activity being attempted.
    pub activity: Option<Activity>,
    /// The current turn phase.
    pub phase: Option<KingdomPhase>,
    /// Situational modifiers: the kingdom's active ones and custom entries.
    pub additional: Vec<Modifier>,
    /// Per-id enable/disable overrides.
    pub overrides: BTreeMap<String, bool>,
}

impl SkillModifiers {
    /// Inputs taken from the kingdom, including its active modifiers.
    pub fn for_kingdom(kingdom: &Kingdom, skill: Skill) -> Self {
        Self {
            skill,
            rank: kingdom.skill_ranks.rank(skill),
            ability_scores: kingdom.ability_scores,
            level: kingdom.level,
            ruin: kingdom.ruin,
            unrest: kingdom.unrest,
            leaders: kingdom.leaders.clone(),
            always_add_level: false,
            unrest_scale: UnrestScale::default(),
            skill_item_bonus: None,
            activity: None,
            phase: None,
            additional: kingdom.modifiers.clone(),
            overrides: BTreeMap::new(),
        }
    }

    /// Set the always-add-level option.
    pub fn with_always_add_level(mut self, always: bool) -> Self {
        self.always_add_level = always;
        self
    }

    /// Use custom unrest tiers.
    pub fn with_unrest_scale(mut self, scale: UnrestScale) -> Self {
        self.unrest_scale = scale;
        self
    }

    /// Fold in a structure item bonus.
    pub fn with_skill_item_bonus(mut self, bonus: Option<SkillItemBonus>) -> Self {
        self.skill_item_bonus = bonus;
        self
    }

    /// The activity being attempted.
    pub fn with_activity(mut self, activity: Option<Activity>) -> Self {
        self.activity = activity;
        self
    }

    /// The current phase.
    pub fn with_phase(mut self, phase: Option<KingdomPhase>) -> Self {
        self.phase = phase;
        self
    }

    /// Append situational modifiers.
    pub fn with_additional(mut self, modifiers: impl IntoIterator<Item = Modifier>) -> Self {
        self.additional.extend(modifiers);
        self
    }

    /// Force modifiers on or off by id.
    pub fn with_overrides(mut self, overrides: BTreeMap<String, bool>) -> Self {
        self.overrides = overrides;
        self
    }

    /// The raw, ordered modifier list before ids and filters.
    pub fn raw(&self) -> Vec<Modifier> {
        let ability = self.skill.ability();
        let mut out = vec![
            create_ability_modifier(ability, &self.ability_scores),
            create_proficiency_modifier(self.rank, self.always_add_level, self.level),
        ];
        out.extend(create_vacancy_modifiers(&self.leaders));
        if let Some(bonus) = &self.skill_item_bonus {
            out.push(create_structure_modifier(bonus));
        }
        out.extend(self.additional.iter().cloned());
        out.extend(create_ruin_modifier(ability, &self.ruin));
        out.extend(create_unrest_modifier(self.unrest, &self.unrest_scale));
        out.extend(create_invested_modifier(self.level, ability, &self.leaders));
        out
    }

    /// The processed modifier list, ready to be totalled.
    pub fn build(&self) -> Vec<ModifierWithId> {
        let modifiers = process_modifiers(
            self.raw(),
            self.skill,
            self.phase,
            self.activity,
            &self.overrides,
        );
        debug!(skill = %self.skill, count = modifiers.len(), "built skill modifiers");
        modifiers
    }
}

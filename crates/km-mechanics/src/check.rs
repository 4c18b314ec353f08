//! Rolling kingdom checks and re-rolling them later.
//!
//! A check is prepared from kingdom state ([`prepare_check`]), rolled into a
//! [`CheckResult`], and leaves behind a [`RollMeta`] replay record. The replay
//! record is all a later re-roll needs; it never looks at the kingdom again.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use km_core::names::normalize;
use km_core::{
    Ability, Activity, ActivityDc, Kingdom, KingdomPhase, Modifier, ModifierType,
    SettlementContext, Skill,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::degree::{DegreeOfSuccess, determine_degree_of_success};
use crate::dice::{DiceRoller, DieResult, Formula};
use crate::error::{MechError, MechResult};
use crate::modifiers::{ModifierTotals, ModifierWithId, SkillModifiers, UnrestScale, calculate_modifiers};

/// A processed modifier list with its totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalAndModifiers {
    /// Totals after stacking.
    pub total: ModifierTotals,
    /// Every modifier considered, enabled or not.
    pub modifiers: Vec<ModifierWithId>,
}

impl TotalAndModifiers {
    /// Total a processed list.
    pub fn new(modifiers: Vec<ModifierWithId>) -> Self {
        let total = calculate_modifiers(modifiers.iter().map(|m| &m.modifier));
        Self { total, modifiers }
    }

    /// Consume tokens of the single-use modifiers that took part.
    pub fn consumed(&self) -> Vec<String> {
        self.modifiers
            .iter()
            .filter(|m| m.modifier.enabled)
            .filter_map(|m| m.modifier.consume_id.clone())
            .collect()
    }
}

/// How the d20 is replaced, if at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RollMode {
    /// `1d20` plus the modifier total.
    #[default]
    Standard,
    /// The modifier total alone, with no natural 1 or 20.
    Assurance,
}

impl RollMode {
    /// The dice formula for a modifier total.
    pub fn formula(self, modifier: i32) -> String {
        match self {
            Self::Standard => format!("1d20{modifier:+}"),
            Self::Assurance => modifier.to_string(),
        }
    }
}

/// Replay record of a finished check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollMeta {
    /// The formula that was rolled.
    pub formula: String,
    /// The activity attempted, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<Activity>,
    /// The resulting degree.
    pub degree: DegreeOfSuccess,
    /// The skill used.
    pub skill: Skill,
    /// The DC.
    pub dc: i32,
    /// The rolled total.
    pub total: i32,
    /// The modifier snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<TotalAndModifiers>,
}

impl RollMeta {
    /// What was rolled for, e.g. `Claim Hex` or `Trade`.
    pub fn label(&self) -> String {
        self.activity.map_or_else(|| self.skill.label(), |a| a.label())
    }
}

/// The result of rolling a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    /// The replay record.
    pub meta: RollMeta,
    /// The unmodified die result: total minus the modifier total.
    pub natural: i32,
    /// Faces of the kept dice.
    pub dice: Vec<DieResult>,
    /// Consume tokens of single-use modifiers used up by this roll.
    pub consumed: Vec<String>,
}

/// Roll `formula` against `dc`.
pub fn roll_check<R: DiceRoller + ?Sized>(
    formula: &str,
    skill: Skill,
    activity: Option<Activity>,
    dc: i32,
    modifiers: Option<TotalAndModifiers>,
    roller: &mut R,
) -> MechResult<CheckResult> {
    let parsed: Formula = formula.parse()?;
    let rolled = parsed.roll(roller)?;
    let modifier_total = modifiers.as_ref().map_or(0, |m| m.total.value);
    let natural = rolled.total - modifier_total;
    let degree = determine_degree_of_success(natural, rolled.total, dc);
    debug!(%formula, total = rolled.total, natural, dc, ?degree, "rolled kingdom check");
    let consumed = modifiers.as_ref().map(TotalAndModifiers::consumed).unwrap_or_default();
    Ok(CheckResult {
        meta: RollMeta {
            formula: formula.to_string(),
            activity,
            degree,
            skill,
            dc,
            total: rolled.total,
            modifiers,
        },
        natural,
        dice: rolled.dice,
        consumed,
    })
}

/// Ways to roll a finished check again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RerollKind {
    /// Roll again and take the new result.
    ReRoll,
    /// Spend a fame point to roll again.
    Fame,
    /// Roll again and keep the better total.
    KeepHigher,
    /// Roll again and keep the worse total.
    KeepLower,
}

impl RerollKind {
    /// Every kind.
    pub const ALL: [RerollKind; 4] = [Self::ReRoll, Self::Fame, Self::KeepHigher, Self::KeepLower];

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReRoll => "re-roll",
            Self::Fame => "fame",
            Self::KeepHigher => "keep-higher",
            Self::KeepLower => "keep-lower",
        }
    }

    /// The formula to roll for a previous check.
    pub fn formula(self, meta: &RollMeta) -> String {
        match self {
            Self::ReRoll | Self::Fame => meta.formula.clone(),
            Self::KeepHigher => format!("{{{},{}}}kh", meta.formula, meta.total),
            Self::KeepLower => format!("{{{},{}}}kl", meta.formula, meta.total),
        }
    }
}

impl fmt::Display for RerollKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RerollKind {
    type Err = MechError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|k| normalize(k.as_str()) == wanted)
            .ok_or_else(|| {
                MechError::Core(km_core::KmError::UnknownName {
                    kind: "re-roll",
                    name: s.to_string(),
                })
            })
    }
}

/// Roll a finished check again from its replay record.
///
/// Single-use modifiers were spent by the first roll, so nothing is consumed
/// again. The fame cost of [`RerollKind::Fame`] is paid by the caller.
pub fn reroll<R: DiceRoller + ?Sized>(
    meta: &RollMeta,
    kind: RerollKind,
    roller: &mut R,
) -> MechResult<CheckResult> {
    let formula = kind.formula(meta);
    let mut result = roll_check(
        &formula,
        meta.skill,
        meta.activity,
        meta.dc,
        meta.modifiers.clone(),
        roller,
    )?;
    result.consumed.clear();
    Ok(result)
}

/// Options that come from settings rather than the check itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckSettings {
    /// Add the level to untrained skills.
    pub always_add_level: bool,
    /// Unrest tiers.
    pub unrest_scale: UnrestScale,
}

/// What the player asked to roll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckRequest {
    /// Skill to use; for activities, defaults to the first usable one.
    pub skill: Option<Skill>,
    /// Activity attempted.
    pub activity: Option<Activity>,
    /// Turn phase; for activities, defaults to the activity's phase.
    pub phase: Option<KingdomPhase>,
    /// DC override; required for activities with a custom DC.
    pub dc: Option<i32>,
    /// Standard roll or Assurance.
    pub mode: RollMode,
    /// Hand-entered adjustments.
    pub custom: Vec<Modifier>,
    /// Per-id enable/disable overrides.
    pub overrides: BTreeMap<String, bool>,
}

impl CheckRequest {
    /// A plain skill check.
    pub fn skill(skill: Skill) -> Self {
        Self {
            skill: Some(skill),
            ..Self::default()
        }
    }

    /// An activity check.
    pub fn activity(activity: Activity) -> Self {
        Self {
            activity: Some(activity),
            ..Self::default()
        }
    }

    /// Use a specific skill.
    pub fn with_skill(mut self, skill: Option<Skill>) -> Self {
        if skill.is_some() {
            self.skill = skill;
        }
        self
    }

    /// Set the phase.
    pub fn with_phase(mut self, phase: Option<KingdomPhase>) -> Self {
        self.phase = phase;
        self
    }

    /// Override the DC.
    pub fn with_dc(mut self, dc: Option<i32>) -> Self {
        self.dc = dc;
        self
    }

    /// Roll with Assurance or normally.
    pub fn with_mode(mut self, mode: RollMode) -> Self {
        self.mode = mode;
        self
    }

    /// Add a hand-entered adjustment.
    pub fn with_custom(mut self, kind: ModifierType, value: i32) -> Self {
        if value != 0 {
            self.custom.push(Modifier::custom(kind, value));
        }
        self
    }

    /// Force modifiers on or off by id.
    pub fn with_overrides(mut self, overrides: BTreeMap<String, bool>) -> Self {
        self.overrides = overrides;
        self
    }
}

/// A check ready to roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedCheck {
    /// Skill used.
    pub skill: Skill,
    /// Activity attempted.
    pub activity: Option<Activity>,
    /// Turn phase.
    pub phase: Option<KingdomPhase>,
    /// DC.
    pub dc: i32,
    /// Formula to roll.
    pub formula: String,
    /// Modifier list and totals.
    pub modifiers: TotalAndModifiers,
}

impl PreparedCheck {
    /// Roll it.
    pub fn roll<R: DiceRoller + ?Sized>(self, roller: &mut R) -> MechResult<CheckResult> {
        roll_check(
            &self.formula,
            self.skill,
            self.activity,
            self.dc,
            Some(self.modifiers),
            roller,
        )
    }
}

/// Work out skill, DC, and modifiers for a check.
///
/// Fails for activities that have no DC, need a DC that was not given, are
/// locked or blacklisted, or can not be attempted with the requested skill.
pub fn prepare_check(
    kingdom: &Kingdom,
    ctx: &SettlementContext,
    settings: &CheckSettings,
    request: &CheckRequest,
) -> MechResult<PreparedCheck> {
    let (skill, phase, dc) = match request.activity {
        Some(activity) => {
            let dc = match activity.dc() {
                ActivityDc::None => return Err(MechError::NoDc(activity)),
                ActivityDc::Control => request.dc.unwrap_or_else(|| kingdom.control_dc()),
                ActivityDc::Custom => request.dc.ok_or(MechError::DcRequired(activity))?,
            };
            if !kingdom.activity_available(activity, ctx) {
                return Err(MechError::ActivityUnavailable(activity));
            }
            let usable = activity.available_skills(&kingdom.skill_ranks);
            let skill = match request.skill {
                Some(skill) if usable.contains(&skill) => skill,
                Some(skill) => return Err(MechError::SkillNotAvailable { skill, activity }),
                None => match usable.first() {
                    Some(skill) => *skill,
                    None => {
                        let skill = activity.skills().first().map_or(Skill::Trade, |s| s.0);
                        return Err(MechError::SkillNotAvailable { skill, activity });
                    }
                },
            };
            (skill, request.phase.or(Some(activity.phase())), dc)
        }
        None => {
            let skill = request.skill.ok_or(MechError::NoSkill)?;
            (skill, request.phase, request.dc.unwrap_or_else(|| kingdom.control_dc()))
        }
    };

    let item_bonus = ctx.skill_bonus(
        &kingdom.settlements,
        kingdom.active_settlement.as_deref(),
        skill,
        request.activity,
    );
    let modifiers = SkillModifiers::for_kingdom(kingdom, skill)
        .with_always_add_level(settings.always_add_level)
        .with_unrest_scale(settings.unrest_scale.clone())
        .with_skill_item_bonus(item_bonus)
        .with_activity(request.activity)
        .with_phase(phase)
        .with_additional(activity_modifiers(kingdom, request.activity))
        .with_additional(request.custom.iter().cloned().map(|mut m| {
            m.custom = true;
            m
        }))
        .with_overrides(request.overrides.clone())
        .build();
    let modifiers = TotalAndModifiers::new(modifiers);
    let formula = request.mode.formula(modifiers.total.value);
    debug!(%skill, activity = ?request.activity, dc, %formula, "prepared kingdom check");
    Ok(PreparedCheck {
        skill,
        activity: request.activity,
        phase,
        dc,
        formula,
        modifiers,
    })
}

/// Bonuses that belong to one activity.
fn activity_modifiers(kingdom: &Kingdom, activity: Option<Activity>) -> Vec<Modifier> {
    let mut out = Vec::new();
    if activity == Some(Activity::ClaimHex) {
        let bonus = kingdom.level_data().claim_hex_circumstance_bonus;
        if bonus > 0 {
            out.push(
                Modifier::new("Claim Hex", ModifierType::Circumstance, bonus)
                    .for_activities(&[Activity::ClaimHex]),
            );
        }
    }
    out
}

/// One row of the kingdom's skill table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillSummary {
    /// Skill.
    pub skill: Skill,
    /// Its key ability.
    pub ability: Ability,
    /// Proficiency rank.
    pub rank: u8,
    /// Totals outside any phase or activity.
    pub total: ModifierTotals,
}

/// Totals for every skill, as shown on the kingdom sheet.
pub fn calculate_skills(
    kingdom: &Kingdom,
    ctx: &SettlementContext,
    settings: &CheckSettings,
) -> Vec<SkillSummary> {
    Skill::ALL
        .iter()
        .map(|skill| {
            let item_bonus = ctx.skill_bonus(
                &kingdom.settlements,
                kingdom.active_settlement.as_deref(),
                *skill,
                None,
            );
            let modifiers = SkillModifiers::for_kingdom(kingdom, *skill)
                .with_always_add_level(settings.always_add_level)
                .with_unrest_scale(settings.unrest_scale.clone())
                .with_skill_item_bonus(item_bonus)
                .build();
            SkillSummary {
                skill: *skill,
                ability: skill.ability(),
                rank: kingdom.skill_ranks.rank(*skill),
                total: TotalAndModifiers::new(modifiers).total,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedRoller;

    fn kingdom() -> Kingdom {
        let mut kingdom = Kingdom::default();
        kingdom.level = 2;
        kingdom.ability_scores.economy = 14;
        kingdom.skill_ranks.set_rank(Skill::Trade, 1);
        kingdom
    }

    #[test]
    fn formula_for_modes() {
        assert_eq!(RollMode::Standard.formula(7), "1d20+7");
        assert_eq!(RollMode::Standard.formula(-2), "1d20-2");
        assert_eq!(RollMode::Assurance.formula(7), "7");
    }

    #[test]
    fn natural_is_total_minus_modifiers() {
        let kingdom = kingdom();
        let check = prepare_check(
            &kingdom,
            &SettlementContext::default(),
            &CheckSettings::default(),
            &CheckRequest::activity(Activity::CollectTaxes),
        )
        .unwrap();
        assert_eq!(check.skill, Skill::Trade);
        assert_eq!(check.dc, 15);
        assert_eq!(check.formula, "1d20+6");
        assert_eq!(check.phase, Some(KingdomPhase::Commerce));

        let result = check.roll(&mut ScriptedRoller::new([20])).unwrap();
        assert_eq!(result.natural, 20);
        assert_eq!(result.meta.total, 26);
        assert_eq!(result.meta.degree, DegreeOfSuccess::CriticalSuccess);
    }

    #[test]
    fn assurance_has_no_natural_adjustment() {
        let kingdom = kingdom();
        let check = prepare_check(
            &kingdom,
            &SettlementContext::default(),
            &CheckSettings::default(),
            &CheckRequest::skill(Skill::Trade).with_mode(RollMode::Assurance).with_dc(Some(6)),
        )
        .unwrap();
        let result = check.roll(&mut ScriptedRoller::new([])).unwrap();
        assert_eq!(result.natural, 0);
        assert_eq!(result.meta.degree, DegreeOfSuccess::Success);
    }

    #[test]
    fn activity_without_dc_is_rejected() {
        let err = prepare_check(
            &kingdom(),
            &SettlementContext::default(),
            &CheckSettings::default(),
            &CheckRequest::activity(Activity::EstablishSettlement),
        )
        .unwrap_err();
        assert!(matches!(err, MechError::NoDc(Activity::EstablishSettlement)));
    }

    #[test]
    fn custom_dc_must_be_given() {
        let request = CheckRequest::activity(Activity::BuildStructure);
        let err = prepare_check(
            &kingdom(),
            &SettlementContext::default(),
            &CheckSettings::default(),
            &request,
        )
        .unwrap_err();
        assert!(matches!(err, MechError::DcRequired(_)));

        let ok = prepare_check(
            &kingdom(),
            &SettlementContext::default(),
            &CheckSettings::default(),
            &request.with_dc(Some(18)),
        )
        .unwrap();
        assert_eq!(ok.dc, 18);
    }

    #[test]
    fn skill_must_be_usable_for_activity() {
        let err = prepare_check(
            &kingdom(),
            &SettlementContext::default(),
            &CheckSettings::default(),
            &CheckRequest::activity(Activity::ClaimHex).with_skill(Some(Skill::Magic)),
        )
        .unwrap_err();
        assert!(matches!(err, MechError::SkillNotAvailable { skill: Skill::Magic, .. }));

        let err = prepare_check(
            &kingdom(),
            &SettlementContext::default(),
            &CheckSettings::default(),
            &CheckRequest::activity(Activity::ManageTradeAgreements),
        )
        .unwrap_err();
        assert!(matches!(err, MechError::SkillNotAvailable { .. }));
    }

    #[test]
    fn locked_activity_is_rejected() {
        let err = prepare_check(
            &kingdom(),
            &SettlementContext::default(),
            &CheckSettings::default(),
            &CheckRequest::activity(Activity::Prognostication),
        )
        .unwrap_err();
        assert!(matches!(err, MechError::ActivityUnavailable(_)));
    }

    #[test]
    fn enabled_consumables_are_reported() {
        let mut kingdom = kingdom();
        kingdom.modifiers.push(
            Modifier::new("Creative Solution", ModifierType::Circumstance, 2).with_consume_id("tok"),
        );
        kingdom.modifiers.push(
            Modifier::new("Fishing Luck", ModifierType::Circumstance, 1)
                .with_consume_id("other")
                .for_activities(&[Activity::GoFishing]),
        );
        let check = prepare_check(
            &kingdom,
            &SettlementContext::default(),
            &CheckSettings::default(),
            &CheckRequest::activity(Activity::CollectTaxes),
        )
        .unwrap();
        let result = check.roll(&mut ScriptedRoller::new([10])).unwrap();
        assert_eq!(result.consumed, vec!["tok".to_string()]);
    }

    #[test]
    fn keep_higher_reroll_keeps_old_total() {
        let kingdom = kingdom();
        let check = prepare_check(
            &kingdom,
            &SettlementContext::default(),
            &CheckSettings::default(),
            &CheckRequest::skill(Skill::Trade),
        )
        .unwrap();
        let first = check.roll(&mut ScriptedRoller::new([14])).unwrap();
        assert_eq!(first.meta.total, 20);

        let again = reroll(&first.meta, RerollKind::KeepHigher, &mut ScriptedRoller::new([2])).unwrap();
        assert_eq!(again.meta.formula, "{1d20+6,20}kh");
        assert_eq!(again.meta.total, 20);
        assert_eq!(again.natural, 14);
        assert!(again.consumed.is_empty());

        let worse = reroll(&first.meta, RerollKind::KeepLower, &mut ScriptedRoller::new([2])).unwrap();
        assert_eq!(worse.meta.total, 8);
    }

    #[test]
    fn claim_hex_bonus_from_level() {
        let mut kingdom = kingdom();
        kingdom.level = 4;
        let check = prepare_check(
            &kingdom,
            &SettlementContext::default(),
            &CheckSettings::default(),
            &CheckRequest::activity(Activity::ClaimHex),
        )
        .unwrap();
        assert_eq!(check.modifiers.total.circumstance.bonus, 2);
    }

    #[test]
    fn reroll_kind_names() {
        assert_eq!("keep-higher".parse::<RerollKind>().unwrap(), RerollKind::KeepHigher);
        assert_eq!("reRoll".parse::<RerollKind>().unwrap(), RerollKind::ReRoll);
        assert!("twice".parse::<RerollKind>().is_err());
    }

    #[test]
    fn skill_table_covers_every_skill() {
        let table = calculate_skills(&kingdom(), &SettlementContext::default(), &CheckSettings::default());
        assert_eq!(table.len(), 16);
        let trade = table.iter().find(|s| s.skill == Skill::Trade).unwrap();
        assert_eq!(trade.total.value, 6);
    }

    #[test]
    fn meta_round_trips_through_json() {
        let result = prepare_check(
            &kingdom(),
            &SettlementContext::default(),
            &CheckSettings::default(),
            &CheckRequest::skill(Skill::Trade),
        )
        .unwrap()
        .roll(&mut ScriptedRoller::new([9]))
        .unwrap();
        let json = serde_json::to_string(&result.meta).unwrap();
        let back: RollMeta = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result.meta);
    }
}

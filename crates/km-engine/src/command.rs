//! Every player action the engine understands, and the dispatcher that turns
//! one into a [`Transition`].

use km_core::{
    BonusFeat, Kingdom, KingdomPatch, Modifier, OngoingEvent, RuinAxis, Settlement,
    SettlementContext,
};
use km_core::{Activity, Group};
use km_mechanics::{
    ActivityResultMeta, CheckRequest, DegreeChange, DiceRoller, EffectRef, RerollKind,
    ResourceChange, RollMeta, change_degree, prepare_check, reroll, resolve_activity,
};
use km_mechanics::activity::resolve::resolve_with_id;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::transition::{Effect, Transition};
use crate::turn::{self, HexFeature};
use crate::xp;

/// Where kingdom XP comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XpSource {
    /// A resolved kingdom event, relative to the kingdom level.
    Event {
        /// Event level minus kingdom level.
        level_difference: i32,
    },
    /// Newly claimed hexes.
    Hexes {
        /// How many.
        count: i32,
    },
    /// Unspent resource points at the end of the turn.
    ResourcePoints,
    /// Unused creative and supernatural solutions.
    Solutions,
    /// A hand-entered amount.
    Custom(i32),
}

/// A player action.
#[derive(Debug, Clone)]
pub enum Command {
    /// Roll a skill check or an activity.
    RollCheck(CheckRequest),
    /// Roll a finished check again.
    Reroll {
        /// The check to roll again.
        meta: RollMeta,
        /// How.
        kind: RerollKind,
    },
    /// Move an outcome one degree up or down.
    ChangeDegree {
        /// The outcome.
        meta: ActivityResultMeta,
        /// Which way.
        change: DegreeChange,
    },
    /// Apply one offered effect of an outcome.
    ApplyEffect {
        /// The outcome.
        meta: ActivityResultMeta,
        /// Which effect.
        effect: EffectRef,
    },
    /// Apply a resource change directly.
    ApplyChange(ResourceChange),
    /// Close the turn.
    EndTurn,
    /// Collect resource dice and commodities.
    CollectResources,
    /// Pay food consumption.
    PayConsumption,
    /// Upkeep unrest.
    AdjustUnrest,
    /// Check for a kingdom event.
    CheckForEvent,
    /// Try to reduce unrest by 1.
    ReduceUnrest,
    /// Try to reduce a ruin penalty by 1.
    ReduceRuin(RuinAxis),
    /// Gain fame points.
    GainFame(i32),
    /// Gain kingdom XP.
    IncreaseXp(XpSource),
    /// Spend XP to gain a level.
    LevelUp,
    /// Claim a hex holding a special feature.
    ClaimedHexFeature(HexFeature),
    /// Add an active modifier.
    AddModifier(Modifier),
    /// Remove the active modifier at an index.
    RemoveModifier(usize),
    /// Add an ongoing event.
    AddEvent(OngoingEvent),
    /// Remove the ongoing event at an index.
    RemoveEvent(usize),
    /// Add a settlement.
    AddSettlement(Settlement),
    /// Remove a settlement by scene id.
    RemoveSettlement(String),
    /// Choose the settlement the leaders act from.
    SetActiveSettlement(Option<String>),
    /// Add a group.
    AddGroup(Group),
    /// Remove the group at an index.
    RemoveGroup(usize),
    /// Add a bonus feat.
    AddBonusFeat(BonusFeat),
    /// Remove the bonus feat at an index.
    RemoveBonusFeat(usize),
    /// Replace the activity blacklist.
    SetBlacklist(Vec<Activity>),
    /// Merge an arbitrary partial update.
    Update(KingdomPatch),
    /// Restore every field to its default.
    Reset,
}

impl Command {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RollCheck(_) => "roll-check",
            Self::Reroll { .. } => "reroll",
            Self::ChangeDegree { .. } => "change-degree",
            Self::ApplyEffect { .. } => "apply-effect",
            Self::ApplyChange(_) => "apply-change",
            Self::EndTurn => "end-turn",
            Self::CollectResources => "collect-resources",
            Self::PayConsumption => "pay-consumption",
            Self::AdjustUnrest => "adjust-unrest",
            Self::CheckForEvent => "check-for-event",
            Self::ReduceUnrest => "reduce-unrest",
            Self::ReduceRuin(_) => "reduce-ruin",
            Self::GainFame(_) => "gain-fame",
            Self::IncreaseXp(_) => "increase-xp",
            Self::LevelUp => "level-up",
            Self::ClaimedHexFeature(_) => "claimed-hex-feature",
            Self::AddModifier(_) => "add-modifier",
            Self::RemoveModifier(_) => "remove-modifier",
            Self::AddEvent(_) => "add-event",
            Self::RemoveEvent(_) => "remove-event",
            Self::AddSettlement(_) => "add-settlement",
            Self::RemoveSettlement(_) => "remove-settlement",
            Self::SetActiveSettlement(_) => "set-active-settlement",
            Self::AddGroup(_) => "add-group",
            Self::RemoveGroup(_) => "remove-group",
            Self::AddBonusFeat(_) => "add-bonus-feat",
            Self::RemoveBonusFeat(_) => "remove-bonus-feat",
            Self::SetBlacklist(_) => "set-blacklist",
            Self::Update(_) => "update",
            Self::Reset => "reset",
        }
    }
}

fn removed<T: Clone>(items: &[T], index: usize, what: &str) -> EngineResult<Vec<T>> {
    if index >= items.len() {
        return Err(EngineError::InvalidAction(format!(
            "no {what} at index {index}, there are {}",
            items.len()
        )));
    }
    let mut out = items.to_vec();
    out.remove(index);
    Ok(out)
}

fn pushed<T: Clone>(items: &[T], item: T) -> Vec<T> {
    let mut out = items.to_vec();
    out.push(item);
    out
}

/// Work out what `command` does to `kingdom`.
///
/// Nothing is saved here; the returned transition carries the patch.
pub fn dispatch<R: DiceRoller + ?Sized>(
    command: Command,
    kingdom: &Kingdom,
    ctx: &SettlementContext,
    config: &EngineConfig,
    roller: &mut R,
) -> EngineResult<Transition> {
    debug!(command = command.name(), "dispatching");
    let transition = match command {
        Command::RollCheck(request) => {
            let prepared = prepare_check(kingdom, ctx, &config.check_settings(), &request)?;
            let result = prepared.roll(roller)?;
            let outcome = resolve_activity(result.meta.activity, result.meta.degree, kingdom);
            info!(
                check = %result.meta.label(),
                total = result.meta.total,
                dc = result.meta.dc,
                degree = %result.meta.degree,
                "rolled check"
            );
            turn::consume_modifiers(kingdom, &result.consumed)
                .with(Effect::Check { result, outcome })
        }
        Command::Reroll { meta, kind } => {
            let cost = if kind == RerollKind::Fame {
                if kingdom.fame.now < 1 {
                    return Err(EngineError::InvalidAction(format!(
                        "a re-roll needs 1 {} point",
                        kingdom.fame.label()
                    )));
                }
                turn::gain_fame(kingdom, -1)
            } else {
                Transition::default()
            };
            let result = reroll(&meta, kind, roller)?;
            let outcome = resolve_activity(result.meta.activity, result.meta.degree, kingdom);
            cost.with(Effect::Check { result, outcome })
        }
        Command::ChangeDegree { meta, change } => Transition::only(Effect::Outcome {
            outcome: change_degree(&meta, change, kingdom),
        }),
        Command::ApplyEffect { meta, effect } => {
            let outcome = resolve_with_id(meta.result_id, meta.activity, meta.degree, kingdom);
            turn::apply_outcome_effect(kingdom, ctx, &outcome, effect, roller)?
        }
        Command::ApplyChange(change) => turn::apply_resource_change(kingdom, ctx, &change, roller)?,
        Command::EndTurn => turn::end_turn(kingdom, ctx),
        Command::CollectResources => turn::collect_resources(kingdom, ctx, roller)?,
        Command::PayConsumption => turn::pay_consumption(kingdom, ctx),
        Command::AdjustUnrest => turn::adjust_unrest(kingdom, ctx, roller)?,
        Command::CheckForEvent => turn::check_for_event(kingdom, roller)?,
        Command::ReduceUnrest => turn::reduce_unrest(kingdom, roller)?,
        Command::ReduceRuin(axis) => turn::reduce_ruin(kingdom, axis, roller)?,
        Command::GainFame(amount) => turn::gain_fame(kingdom, amount),
        Command::IncreaseXp(source) => {
            let homebrew = config.vance_and_kerenshara_xp;
            let amount = match source {
                XpSource::Event { level_difference } => xp::event_xp(level_difference),
                XpSource::Hexes { count } => xp::hex_xp(count, kingdom.size, homebrew),
                XpSource::ResourcePoints => {
                    xp::rp_xp(kingdom.resource_points.now, kingdom.level, homebrew)
                }
                XpSource::Solutions => {
                    xp::solution_xp(kingdom.creative_solutions, kingdom.supernatural_solutions)
                }
                XpSource::Custom(amount) => amount,
            };
            turn::increase_xp(kingdom, amount)
        }
        Command::LevelUp => turn::level_up(kingdom)?,
        Command::ClaimedHexFeature(feature) => turn::claim_hex_feature(kingdom, feature, roller)?,
        Command::AddModifier(modifier) => Transition::patch(KingdomPatch {
            modifiers: Some(pushed(&kingdom.modifiers, modifier)),
            ..KingdomPatch::default()
        }),
        Command::RemoveModifier(index) => Transition::patch(KingdomPatch {
            modifiers: Some(removed(&kingdom.modifiers, index, "modifier")?),
            ..KingdomPatch::default()
        }),
        Command::AddEvent(event) => Transition::patch(KingdomPatch {
            ongoing_events: Some(pushed(&kingdom.ongoing_events, event)),
            ..KingdomPatch::default()
        }),
        Command::RemoveEvent(index) => Transition::patch(KingdomPatch {
            ongoing_events: Some(removed(&kingdom.ongoing_events, index, "event")?),
            ..KingdomPatch::default()
        }),
        Command::AddSettlement(settlement) => {
            if kingdom
                .settlements
                .iter()
                .any(|s| s.scene_id == settlement.scene_id)
            {
                return Err(EngineError::InvalidAction(format!(
                    "settlement '{}' already exists",
                    settlement.scene_id
                )));
            }
            Transition::patch(KingdomPatch {
                settlements: Some(pushed(&kingdom.settlements, settlement)),
                ..KingdomPatch::default()
            })
        }
        Command::RemoveSettlement(scene_id) => {
            let settlements: Vec<Settlement> = kingdom
                .settlements
                .iter()
                .filter(|s| s.scene_id != scene_id)
                .cloned()
                .collect();
            if settlements.len() == kingdom.settlements.len() {
                return Err(EngineError::InvalidAction(format!(
                    "no settlement '{scene_id}'"
                )));
            }
            let mut patch = KingdomPatch {
                settlements: Some(settlements),
                ..KingdomPatch::default()
            };
            if kingdom.active_settlement.as_deref() == Some(scene_id.as_str()) {
                patch.active_settlement = Some(None);
            }
            Transition::patch(patch)
        }
        Command::SetActiveSettlement(scene_id) => {
            if let Some(id) = &scene_id {
                if !kingdom.settlements.iter().any(|s| &s.scene_id == id) {
                    return Err(EngineError::InvalidAction(format!("no settlement '{id}'")));
                }
            }
            Transition::patch(KingdomPatch {
                active_settlement: Some(scene_id),
                ..KingdomPatch::default()
            })
        }
        Command::AddGroup(group) => Transition::patch(KingdomPatch {
            groups: Some(pushed(&kingdom.groups, group)),
            ..KingdomPatch::default()
        }),
        Command::RemoveGroup(index) => Transition::patch(KingdomPatch {
            groups: Some(removed(&kingdom.groups, index, "group")?),
            ..KingdomPatch::default()
        }),
        Command::AddBonusFeat(feat) => Transition::patch(KingdomPatch {
            bonus_feats: Some(pushed(&kingdom.bonus_feats, feat)),
            ..KingdomPatch::default()
        }),
        Command::RemoveBonusFeat(index) => Transition::patch(KingdomPatch {
            bonus_feats: Some(removed(&kingdom.bonus_feats, index, "bonus feat")?),
            ..KingdomPatch::default()
        }),
        Command::SetBlacklist(activities) => Transition::patch(KingdomPatch {
            activity_blacklist: Some(activities),
            ..KingdomPatch::default()
        }),
        Command::Update(patch) => Transition::patch(patch),
        Command::Reset => Transition::patch(KingdomPatch::diff(kingdom, &Kingdom::default()))
            .with(Effect::notice("Kingdom reset to defaults")),
    };
    Ok(transition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use km_core::{ModifierType, Skill};
    use km_mechanics::{DegreeOfSuccess, ScriptedRoller};

    fn run(command: Command, kingdom: &Kingdom, rolls: &[u32]) -> EngineResult<Transition> {
        let mut roller = ScriptedRoller::new(rolls.iter().copied());
        dispatch(
            command,
            kingdom,
            &SettlementContext::default(),
            &EngineConfig::default(),
            &mut roller,
        )
    }

    fn check_effect(transition: &Transition) -> (&km_mechanics::CheckResult, &km_mechanics::ActivityOutcome) {
        transition
            .effects
            .iter()
            .find_map(|e| match e {
                Effect::Check { result, outcome } => Some((result, outcome)),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn roll_check_resolves_outcome() {
        let kingdom = Kingdom::default();
        let transition = run(
            Command::RollCheck(CheckRequest::activity(Activity::CelebrateHoliday)),
            &kingdom,
            &[20],
        )
        .unwrap();
        let (result, outcome) = check_effect(&transition);
        assert_eq!(result.natural, 20);
        assert_eq!(outcome.degree, DegreeOfSuccess::CriticalSuccess);
        assert_eq!(outcome.activity, Some(Activity::CelebrateHoliday));
        assert!(transition.patch.is_none());
    }

    #[test]
    fn roll_check_consumes_single_use_modifiers() {
        let mut kingdom = Kingdom::default();
        kingdom.modifiers.push(
            Modifier::new("Foreign Aid", ModifierType::Circumstance, 2).with_consume_id("aid"),
        );
        let transition = run(
            Command::RollCheck(CheckRequest::skill(Skill::Agriculture)),
            &kingdom,
            &[10],
        )
        .unwrap();
        let after = transition.applied_to(&kingdom);
        assert!(after.modifiers.is_empty());
    }

    #[test]
    fn fame_reroll_costs_fame() {
        let mut kingdom = Kingdom::default();
        let first = run(
            Command::RollCheck(CheckRequest::skill(Skill::Arts)),
            &kingdom,
            &[3],
        )
        .unwrap();
        let meta = check_effect(&first).0.meta.clone();

        let broke = run(
            Command::Reroll {
                meta: meta.clone(),
                kind: RerollKind::Fame,
            },
            &kingdom,
            &[15],
        );
        assert!(matches!(broke, Err(EngineError::InvalidAction(_))));

        kingdom.fame.now = 2;
        let paid = run(
            Command::Reroll {
                meta,
                kind: RerollKind::Fame,
            },
            &kingdom,
            &[15],
        )
        .unwrap();
        assert_eq!(paid.applied_to(&kingdom).fame.now, 1);
        assert_eq!(check_effect(&paid).0.natural, 15);
    }

    #[test]
    fn apply_effect_is_single_use() {
        let kingdom = Kingdom::default();
        let meta = ActivityResultMeta {
            activity: Some(Activity::CelebrateHoliday),
            degree: DegreeOfSuccess::Success,
            result_id: "abc".to_string(),
        };
        let command = || Command::ApplyEffect {
            meta: meta.clone(),
            effect: EffectRef::Modifier(0),
        };
        let kingdom = run(command(), &kingdom, &[]).unwrap().applied_to(&kingdom);
        assert_eq!(kingdom.modifiers.len(), 1);
        let again = run(command(), &kingdom, &[]).unwrap();
        assert!(again.patch.is_none());
    }

    #[test]
    fn change_degree_offers_new_outcome() {
        let kingdom = Kingdom::default();
        let meta = ActivityResultMeta {
            activity: Some(Activity::CelebrateHoliday),
            degree: DegreeOfSuccess::Failure,
            result_id: "abc".to_string(),
        };
        let transition = run(
            Command::ChangeDegree {
                meta,
                change: DegreeChange::Upgrade,
            },
            &kingdom,
            &[],
        )
        .unwrap();
        match &transition.effects[0] {
            Effect::Outcome { outcome } => {
                assert_eq!(outcome.degree, DegreeOfSuccess::Success);
                assert_eq!(outcome.result_id, "abc@success");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn xp_sources() {
        let mut kingdom = Kingdom::default();
        kingdom.resource_points.now = 200;
        let rp = run(Command::IncreaseXp(XpSource::ResourcePoints), &kingdom, &[]).unwrap();
        assert_eq!(rp.applied_to(&kingdom).xp, 120);
        let event = run(
            Command::IncreaseXp(XpSource::Event {
                level_difference: 0,
            }),
            &kingdom,
            &[],
        )
        .unwrap();
        assert_eq!(event.effects, vec![Effect::XpGained { amount: 40 }]);
    }

    #[test]
    fn list_edits() {
        let kingdom = Kingdom::default();
        assert!(run(Command::RemoveModifier(0), &kingdom, &[]).is_err());

        let kingdom = run(
            Command::AddSettlement(Settlement {
                scene_id: "capital".to_string(),
                ..Settlement::default()
            }),
            &kingdom,
            &[],
        )
        .unwrap()
        .applied_to(&kingdom);
        let kingdom = run(
            Command::SetActiveSettlement(Some("capital".to_string())),
            &kingdom,
            &[],
        )
        .unwrap()
        .applied_to(&kingdom);
        assert_eq!(kingdom.active_settlement.as_deref(), Some("capital"));
        assert!(run(
            Command::SetActiveSettlement(Some("nowhere".to_string())),
            &kingdom,
            &[]
        )
        .is_err());

        let kingdom = run(
            Command::RemoveSettlement("capital".to_string()),
            &kingdom,
            &[],
        )
        .unwrap()
        .applied_to(&kingdom);
        assert!(kingdom.settlements.is_empty());
        assert_eq!(kingdom.active_settlement, None);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut kingdom = Kingdom::default();
        kingdom.unrest = 5;
        kingdom.name = "Stolen Lands".to_string();
        let after = run(Command::Reset, &kingdom, &[]).unwrap().applied_to(&kingdom);
        assert_eq!(after, Kingdom::default());
    }
}

//! Kingdom turn transitions.
//!
//! Every function reads the current kingdom and returns a single
//! [`Transition`]; nothing here writes to a store. Random inputs come from
//! the passed [`DiceRoller`], so callers can supply table rolls.

use std::str::FromStr;

use km_core::kingdom::MAX_LEVEL;
use km_core::names::normalize;
use km_core::{
    Ability, Buffered, Commodity, Consumption, Fame, Kingdom, KingdomPatch, KmError, MAX_FAME,
    Modifier, ModifierType, RuinAxis, SettlementContext,
};
use km_mechanics::{
    ActivityOutcome, DiceRoller, EffectRef, Formula, Resource, ResourceChange,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};
use crate::transition::{Effect, Transition};

/// Unrest at which ruin and hex loss are rolled during upkeep.
pub const UNREST_RUIN_THRESHOLD: i32 = 10;

/// Flat DC to keep every hex when unrest is high.
pub const HEX_LOSS_DC: i32 = 11;

/// RP a missing food commodity costs.
pub const RP_PER_MISSING_FOOD: i32 = 5;

/// Applied effect tokens kept on the kingdom, newest last.
pub const MAX_APPLIED_EFFECTS: usize = 64;

fn roll<R: DiceRoller + ?Sized>(formula: &str, roller: &mut R) -> EngineResult<i32> {
    let formula: Formula = formula.parse()?;
    Ok(formula.roll(roller)?.total)
}

/// Close the turn: tick modifiers and move every `next` buffer into `now`.
///
/// `now` values gain their `next` counterpart, commodities are clamped to
/// storage capacity, fame to [`MAX_FAME`], and all `next` buffers and banked
/// solutions are zeroed. Running it again right away leaves `now` unchanged.
pub fn end_turn(kingdom: &Kingdom, ctx: &SettlementContext) -> Transition {
    let modifiers: Vec<Modifier> = kingdom.modifiers.iter().filter_map(Modifier::tick).collect();
    let capacity = kingdom.commodity_capacity(ctx);
    let mut commodities = kingdom.commodities.now;
    for (commodity, next) in kingdom.commodities.next.iter() {
        let slot = commodities.get_mut(commodity);
        *slot = (*slot + next).min(capacity.get(commodity));
    }
    let fame = Fame {
        now: (kingdom.fame.now + kingdom.fame.next).clamp(0, MAX_FAME),
        next: 0,
        kind: kingdom.fame.kind,
    };
    let expired = kingdom.modifiers.len() - modifiers.len();
    info!(expired, "ending kingdom turn");

    Transition::patch(KingdomPatch {
        modifiers: Some(modifiers),
        fame: Some(fame),
        resource_points: Some(Buffered {
            now: kingdom.resource_points.now + kingdom.resource_points.next,
            next: 0,
        }),
        resource_dice: Some(Buffered {
            now: kingdom.resource_dice.now + kingdom.resource_dice.next,
            next: 0,
        }),
        consumption: Some(Consumption {
            now: kingdom.consumption.now + kingdom.consumption.next,
            next: 0,
            armies: kingdom.consumption.armies,
        }),
        commodities: Some(Buffered {
            now: commodities,
            next: Default::default(),
        }),
        supernatural_solutions: Some(0),
        creative_solutions: Some(0),
        ..KingdomPatch::default()
    })
    .with(Effect::notice(format!(
        "Ending turn: {expired} effect(s) expired, next-turn values moved to now, solutions reset"
    )))
}

/// Number of resource dice rolled when collecting.
pub fn resource_dice_count(kingdom: &Kingdom) -> i32 {
    let feat = i32::from(kingdom.has_feat("Insider Trading"));
    (kingdom.level_data().resource_dice + kingdom.resource_dice.now + feat).max(0)
}

/// Roll resource dice into RP and gather commodities from work sites.
///
/// Commodities are clamped to capacity; food is never gathered here.
/// Bonus resource dice are spent.
pub fn collect_resources<R: DiceRoller + ?Sized>(
    kingdom: &Kingdom,
    ctx: &SettlementContext,
    roller: &mut R,
) -> EngineResult<Transition> {
    let dice = resource_dice_count(kingdom);
    let formula = format!("{dice}{}", kingdom.size_data().resource_die());
    let rolled = if dice > 0 { roll(&formula, roller)? } else { 0 };

    let produced = kingdom.work_sites.production();
    let capacity = kingdom.commodity_capacity(ctx);
    let mut now = kingdom.commodities.now;
    for (commodity, amount) in produced.iter() {
        if commodity == Commodity::Food {
            continue;
        }
        let slot = now.get_mut(commodity);
        *slot = (*slot + amount).min(capacity.get(commodity));
    }
    info!(dice, rolled, "collected resources");

    let gathered: Vec<String> = produced
        .iter()
        .filter(|(commodity, _)| *commodity != Commodity::Food)
        .map(|(commodity, amount)| format!("{} {amount}", commodity.label()))
        .collect();
    Ok(Transition::patch(KingdomPatch {
        resource_points: Some(Buffered {
            now: kingdom.resource_points.now + rolled,
            next: kingdom.resource_points.next,
        }),
        resource_dice: Some(Buffered {
            now: 0,
            next: kingdom.resource_dice.next,
        }),
        commodities: Some(Buffered {
            now,
            next: kingdom.commodities.next,
        }),
        ..KingdomPatch::default()
    })
    .with(Effect::Rolled {
        label: "Resource Dice".to_string(),
        formula,
        total: rolled,
    })
    .with(Effect::notice(format!("Collected {}", gathered.join(", ")))))
}

/// Eat this turn's food.
///
/// Missing food is reported with its two remedies as offers: paying RP or
/// taking unrest.
pub fn pay_consumption(kingdom: &Kingdom, ctx: &SettlementContext) -> Transition {
    let consumption = kingdom.total_consumption(ctx);
    if consumption == 0 {
        return Transition::only(Effect::notice("No food to pay this turn"));
    }
    let food = kingdom.commodities.now.food;
    let mut now = kingdom.commodities.now;
    now.food = (food - consumption).max(0);
    let mut transition = Transition::patch(KingdomPatch {
        commodities: Some(Buffered {
            now,
            next: kingdom.commodities.next,
        }),
        ..KingdomPatch::default()
    })
    .with(Effect::notice(format!(
        "Reducing food by {}",
        food.min(consumption).max(0)
    )));

    let missing = consumption - food.max(0);
    if missing > 0 {
        debug!(missing, "not enough food");
        transition = transition
            .with(Effect::notice(format!(
                "Missing {missing} food: pay {} RP or gain 1d4 Unrest",
                missing * RP_PER_MISSING_FOOD
            )))
            .with(Effect::Offer {
                change: ResourceChange::lose(Resource::ResourcePoints, missing * RP_PER_MISSING_FOOD),
            })
            .with(Effect::Offer {
                change: ResourceChange::gain(Resource::Unrest, "1d4"),
            });
    }
    transition
}

/// Upkeep unrest from war, overcrowding, secondary territories, and a
/// vacant ruler seat.
///
/// From level 20 on, increases are ignored. At high unrest, ruin points and
/// the hex-loss check are rolled and reported for the player to resolve.
pub fn adjust_unrest<R: DiceRoller + ?Sized>(
    kingdom: &Kingdom,
    ctx: &SettlementContext,
    roller: &mut R,
) -> EngineResult<Transition> {
    let overcrowded = i32::try_from(ctx.overcrowded(&kingdom.settlements)).unwrap_or(i32::MAX);
    let secondary = i32::from(kingdom.settlements.iter().any(|s| s.secondary_territory));
    let war = i32::from(kingdom.at_war);
    let mut effects = Vec::new();
    let vacancy = if kingdom.leaders.ruler.vacant {
        let total = roll("1d4", roller)?;
        effects.push(Effect::Rolled {
            label: "Ruler Vacancy Unrest".to_string(),
            formula: "1d4".to_string(),
            total,
        });
        total
    } else {
        0
    };
    let increase = overcrowded + secondary + war + vacancy;

    let unrest = if kingdom.level >= MAX_LEVEL {
        effects.push(Effect::notice(
            "Ignoring any Unrest increase due to the Envy of the World kingdom feature",
        ));
        kingdom.unrest
    } else {
        effects.push(Effect::notice(format!(
            "Gaining {increase} Unrest: overcrowded settlements {overcrowded}, secondary territories {secondary}, at war {war}, ruler vacancy {vacancy}"
        )));
        kingdom.unrest + increase
    };

    if unrest >= UNREST_RUIN_THRESHOLD {
        let points = roll("1d10", roller)?;
        effects.push(Effect::RuinTriggered { points });
        let check = roll("1d20", roller)?;
        effects.push(Effect::Rolled {
            label: format!("Hex loss, DC {HEX_LOSS_DC}"),
            formula: "1d20".to_string(),
            total: check,
        });
        if check >= HEX_LOSS_DC {
            effects.push(Effect::HexLost);
        }
    }
    let threshold = kingdom.anarchy_threshold();
    if unrest >= threshold {
        effects.push(Effect::Anarchy { threshold });
    }
    info!(from = kingdom.unrest, to = unrest, "adjusted unrest");

    let mut transition = Transition::patch(KingdomPatch {
        unrest: Some(unrest),
        ..KingdomPatch::default()
    });
    transition.effects = effects;
    Ok(transition)
}

/// Flat check for a kingdom event against the event DC.
pub fn check_for_event<R: DiceRoller + ?Sized>(
    kingdom: &Kingdom,
    roller: &mut R,
) -> EngineResult<Transition> {
    let dc = kingdom.event_dc();
    let total = roll("1d20", roller)?;
    let occurs = total >= dc;
    info!(dc, total, occurs, "checked for kingdom event");
    let transition = Transition::patch(KingdomPatch {
        turns_without_event: Some(if occurs {
            0
        } else {
            kingdom.turns_without_event + 1
        }),
        ..KingdomPatch::default()
    })
    .with(Effect::Rolled {
        label: format!("Event check, DC {dc}"),
        formula: "1d20".to_string(),
        total,
    });
    Ok(if occurs {
        transition.with(Effect::EventOccurs)
    } else {
        transition
    })
}

/// Reduce unrest by 1 on a d20 roll of 11 or higher.
pub fn reduce_unrest<R: DiceRoller + ?Sized>(
    kingdom: &Kingdom,
    roller: &mut R,
) -> EngineResult<Transition> {
    let total = roll("1d20", roller)?;
    let rolled = Effect::Rolled {
        label: "Reduce Unrest on 11 or higher".to_string(),
        formula: "1d20".to_string(),
        total,
    };
    if total > 10 {
        Ok(Transition::patch(KingdomPatch {
            unrest: Some((kingdom.unrest - 1).max(0)),
            ..KingdomPatch::default()
        })
        .with(rolled))
    } else {
        Ok(Transition::only(rolled))
    }
}

/// Lower the penalty of a ruin axis by 1 on a d20 roll of 16 or higher.
///
/// Only allowed while the axis has no accumulated ruin and a penalty left.
pub fn reduce_ruin<R: DiceRoller + ?Sized>(
    kingdom: &Kingdom,
    axis: RuinAxis,
    roller: &mut R,
) -> EngineResult<Transition> {
    let values = kingdom.ruin.get(axis);
    if values.value != 0 || values.penalty <= 0 {
        return Err(EngineError::InvalidAction(format!(
            "{} can only be reduced with no ruin points and a penalty left",
            axis.label()
        )));
    }
    let total = roll("1d20", roller)?;
    let rolled = Effect::Rolled {
        label: format!("Reduce {} on 16 or higher", axis.label()),
        formula: "1d20".to_string(),
        total,
    };
    if total < 16 {
        return Ok(Transition::only(rolled));
    }
    let mut ruin = kingdom.ruin;
    ruin.get_mut(axis).penalty = (values.penalty - 1).max(0);
    Ok(Transition::patch(KingdomPatch {
        ruin: Some(ruin),
        ..KingdomPatch::default()
    })
    .with(rolled))
}

/// Gain fame points, up to the ceiling.
pub fn gain_fame(kingdom: &Kingdom, amount: i32) -> Transition {
    let fame = kingdom.fame.gain(amount);
    Transition::patch(KingdomPatch {
        fame: Some(fame),
        ..KingdomPatch::default()
    })
    .with(Effect::notice(format!(
        "{} is now {}",
        fame.label(),
        fame.now
    )))
}

/// Add kingdom XP.
pub fn increase_xp(kingdom: &Kingdom, amount: i32) -> Transition {
    Transition::patch(KingdomPatch {
        xp: Some((kingdom.xp + amount).max(0)),
        ..KingdomPatch::default()
    })
    .with(Effect::XpGained { amount })
}

/// Spend the XP threshold to gain a level.
pub fn level_up(kingdom: &Kingdom) -> EngineResult<Transition> {
    if kingdom.level >= MAX_LEVEL {
        return Err(EngineError::InvalidAction(format!(
            "the kingdom is already level {MAX_LEVEL}"
        )));
    }
    if kingdom.xp < kingdom.xp_threshold {
        return Err(EngineError::InvalidAction(
            "can not level up, not enough XP".to_string(),
        ));
    }
    let level = kingdom.level + 1;
    info!(level, "kingdom leveled up");
    Ok(Transition::patch(KingdomPatch {
        level: Some(level),
        xp: Some(kingdom.xp - kingdom.xp_threshold),
        ..KingdomPatch::default()
    })
    .with(Effect::notice(format!("The kingdom reached level {level}"))))
}

/// A special feature found in a claimed hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HexFeature {
    /// A refuge: loyalty and stability bonus, and one ruin reduced.
    Refuge,
    /// A landmark: culture and economy bonus, and unrest reduced.
    Landmark,
}

impl FromStr for HexFeature {
    type Err = KmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "refuge" => Ok(Self::Refuge),
            "landmark" => Ok(Self::Landmark),
            _ => Err(KmError::UnknownName {
                kind: "hex feature",
                name: s.to_string(),
            }),
        }
    }
}

fn feature_bonus(name: &str, abilities: &[Ability]) -> Modifier {
    Modifier::new(name, ModifierType::Circumstance, 2)
        .for_abilities(abilities)
        .with_turns(2)
}

/// Claim a hex holding a refuge or landmark.
pub fn claim_hex_feature<R: DiceRoller + ?Sized>(
    kingdom: &Kingdom,
    feature: HexFeature,
    roller: &mut R,
) -> EngineResult<Transition> {
    let mut modifiers = kingdom.modifiers.clone();
    match feature {
        HexFeature::Refuge => {
            modifiers.push(feature_bonus(
                "Claimed Refuge",
                &[Ability::Loyalty, Ability::Stability],
            ));
            Ok(Transition::patch(KingdomPatch {
                modifiers: Some(modifiers),
                ..KingdomPatch::default()
            })
            .with(Effect::notice(
                "Claimed a Refuge, reduce a Ruin of your choice by 1",
            )))
        }
        HexFeature::Landmark => {
            let total = roll("1d4", roller)?;
            modifiers.push(feature_bonus(
                "Claimed Landmark",
                &[Ability::Culture, Ability::Economy],
            ));
            Ok(Transition::patch(KingdomPatch {
                unrest: Some((kingdom.unrest - total).max(0)),
                modifiers: Some(modifiers),
                ..KingdomPatch::default()
            })
            .with(Effect::Rolled {
                label: "Claimed a Landmark, reducing Unrest".to_string(),
                formula: "1d4".to_string(),
                total,
            }))
        }
    }
}

/// The patch that adds `amount` (possibly negative) to a resource.
///
/// Counters floor at zero, commodities available now stay within capacity,
/// fame within its ceiling, and ruin rolls over into its penalty.
pub fn change_resource(
    kingdom: &Kingdom,
    ctx: &SettlementContext,
    resource: Resource,
    amount: i32,
) -> KingdomPatch {
    let floor = |value: i32| (value + amount).max(0);
    let mut patch = KingdomPatch::default();
    match resource {
        Resource::Unrest => patch.unrest = Some(floor(kingdom.unrest)),
        Resource::ResourcePoints => {
            patch.resource_points = Some(Buffered {
                now: floor(kingdom.resource_points.now),
                ..kingdom.resource_points
            });
        }
        Resource::ResourcePointsNext => {
            patch.resource_points = Some(Buffered {
                next: floor(kingdom.resource_points.next),
                ..kingdom.resource_points
            });
        }
        Resource::ResourceDice => {
            patch.resource_dice = Some(Buffered {
                now: floor(kingdom.resource_dice.now),
                ..kingdom.resource_dice
            });
        }
        Resource::ResourceDiceNext => {
            patch.resource_dice = Some(Buffered {
                next: floor(kingdom.resource_dice.next),
                ..kingdom.resource_dice
            });
        }
        Resource::Fame => patch.fame = Some(kingdom.fame.gain(amount)),
        Resource::FameNext => {
            patch.fame = Some(Fame {
                next: floor(kingdom.fame.next),
                ..kingdom.fame
            });
        }
        Resource::Commodity { commodity, next } => {
            let mut commodities = kingdom.commodities;
            if next {
                let slot = commodities.next.get_mut(commodity);
                *slot = floor(*slot);
            } else {
                let cap = kingdom.commodity_capacity(ctx).get(commodity);
                let slot = commodities.now.get_mut(commodity);
                *slot = floor(*slot).min(cap);
            }
            patch.commodities = Some(commodities);
        }
        Resource::Ruin(axis) => {
            let mut ruin = kingdom.ruin;
            ruin.get_mut(axis).add(amount);
            patch.ruin = Some(ruin);
        }
        Resource::Xp => patch.xp = Some(floor(kingdom.xp)),
        Resource::CreativeSolutions => {
            patch.creative_solutions = Some(floor(kingdom.creative_solutions));
        }
        Resource::SupernaturalSolutions => {
            patch.supernatural_solutions = Some(floor(kingdom.supernatural_solutions));
        }
    }
    patch
}

/// Roll and apply a gain or lose change.
pub fn apply_resource_change<R: DiceRoller + ?Sized>(
    kingdom: &Kingdom,
    ctx: &SettlementContext,
    change: &ResourceChange,
    roller: &mut R,
) -> EngineResult<Transition> {
    let amount = change.signed_amount(roller)?;
    debug!(resource = %change.resource, amount, "applying resource change");
    let verb = if amount < 0 { "Lost" } else { "Gained" };
    Ok(
        Transition::patch(change_resource(kingdom, ctx, change.resource, amount)).with(
            Effect::notice(format!(
                "{verb} {} {}",
                amount.abs(),
                change.resource.label()
            )),
        ),
    )
}

/// Remove the active modifiers whose consume token is in `ids`.
pub fn consume_modifiers(kingdom: &Kingdom, ids: &[String]) -> Transition {
    if ids.is_empty() {
        return Transition::default();
    }
    let modifiers: Vec<Modifier> = kingdom
        .modifiers
        .iter()
        .filter(|m| m.consume_id.as_ref().is_none_or(|id| !ids.contains(id)))
        .cloned()
        .collect();
    if modifiers.len() == kingdom.modifiers.len() {
        return Transition::default();
    }
    debug!(removed = kingdom.modifiers.len() - modifiers.len(), "consumed modifiers");
    Transition::patch(KingdomPatch {
        modifiers: Some(modifiers),
        ..KingdomPatch::default()
    })
}

/// Apply one offered effect of an activity outcome, at most once.
///
/// A token already recorded in `applied_effects` yields
/// [`Effect::AlreadyConsumed`] and no patch, as does any effect once another
/// degree of the same roll was applied. An effect the outcome does not offer
/// is logged and ignored. Only the newest [`MAX_APPLIED_EFFECTS`] tokens are
/// kept.
pub fn apply_outcome_effect<R: DiceRoller + ?Sized>(
    kingdom: &Kingdom,
    ctx: &SettlementContext,
    outcome: &ActivityOutcome,
    effect: EffectRef,
    roller: &mut R,
) -> EngineResult<Transition> {
    let token = outcome.token(effect);
    if kingdom.applied_effects.contains(&token) {
        debug!(%token, "effect already applied");
        return Ok(Transition::only(Effect::AlreadyConsumed { token }));
    }
    if let Some(spent) = kingdom
        .applied_effects
        .iter()
        .find(|t| outcome.is_sibling_token(t))
    {
        debug!(%token, %spent, "another degree of this roll was applied");
        return Ok(Transition::only(Effect::AlreadyConsumed {
            token: spent.clone(),
        }));
    }
    if !outcome.offers(effect) {
        warn!(%token, "outcome has no such effect");
        return Ok(Transition::only(Effect::notice(format!(
            "Nothing to apply for {effect}"
        ))));
    }

    let applied = match effect {
        EffectRef::Modifier(index) => {
            let modifier = outcome.modifiers[index].clone();
            let mut modifiers = kingdom.modifiers.clone();
            let label = modifier.label();
            modifiers.push(modifier);
            Transition::patch(KingdomPatch {
                modifiers: Some(modifiers),
                ..KingdomPatch::default()
            })
            .with(Effect::notice(format!("Added {label}")))
        }
        EffectRef::Change(index) => {
            apply_resource_change(kingdom, ctx, &outcome.changes[index], roller)?
        }
        EffectRef::Fame => gain_fame(kingdom, 1),
    };
    let mut applied_effects = kingdom.applied_effects.clone();
    applied_effects.push(token);
    if applied_effects.len() > MAX_APPLIED_EFFECTS {
        let excess = applied_effects.len() - MAX_APPLIED_EFFECTS;
        applied_effects.drain(..excess);
    }
    Ok(applied.then(Transition::patch(KingdomPatch {
        applied_effects: Some(applied_effects),
        ..KingdomPatch::default()
    })))
}

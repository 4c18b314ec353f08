//! Scripted outcomes of every kingdom activity.

use std::fmt;
use std::str::FromStr;

use km_core::names::normalize;
use km_core::{Ability, Activity, Commodity, Kingdom, KingdomPhase, KmError, Modifier, ModifierType, RuinAxis};
use serde::{Deserialize, Serialize};

use crate::degree::DegreeOfSuccess;
use crate::dice::{DiceRoller, Formula};
use crate::error::MechResult;

/// A kingdom value that an outcome can raise or lower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Resource {
    /// Unrest.
    Unrest,
    /// Resource points available now.
    ResourcePoints,
    /// Resource points arriving next turn.
    ResourcePointsNext,
    /// Bonus resource dice for this turn's collection.
    ResourceDice,
    /// Bonus resource dice for next turn.
    ResourceDiceNext,
    /// Fame or infamy points.
    Fame,
    /// Fame arriving next turn.
    FameNext,
    /// A stockpiled commodity, now or next turn.
    Commodity {
        /// Which commodity.
        commodity: Commodity,
        /// Whether the change lands next turn.
        next: bool,
    },
    /// Points on a ruin axis.
    Ruin(RuinAxis),
    /// Kingdom experience.
    Xp,
    /// Banked creative solutions.
    CreativeSolutions,
    /// Banked supernatural solutions.
    SupernaturalSolutions,
}

impl Resource {
    /// A commodity available this turn.
    pub fn commodity(commodity: Commodity) -> Self {
        Self::Commodity {
            commodity,
            next: false,
        }
    }

    /// Wire name, e.g. `rp-next` or `food`.
    pub fn as_string(self) -> String {
        match self {
            Self::Unrest => "unrest".to_string(),
            Self::ResourcePoints => "rp".to_string(),
            Self::ResourcePointsNext => "rp-next".to_string(),
            Self::ResourceDice => "resource-dice".to_string(),
            Self::ResourceDiceNext => "resource-dice-next".to_string(),
            Self::Fame => "fame".to_string(),
            Self::FameNext => "fame-next".to_string(),
            Self::Commodity {
                commodity,
                next: false,
            } => commodity.as_str().to_string(),
            Self::Commodity {
                commodity,
                next: true,
            } => format!("{commodity}-next"),
            Self::Ruin(axis) => axis.as_str().to_string(),
            Self::Xp => "xp".to_string(),
            Self::CreativeSolutions => "creative-solutions".to_string(),
            Self::SupernaturalSolutions => "supernatural-solutions".to_string(),
        }
    }

    /// Label shown on gain and lose buttons.
    pub fn label(self) -> String {
        let base = match self {
            Self::Unrest => "Unrest".to_string(),
            Self::ResourcePoints | Self::ResourcePointsNext => "RP".to_string(),
            Self::ResourceDice | Self::ResourceDiceNext => "Resource Dice".to_string(),
            Self::Fame | Self::FameNext => "Fame".to_string(),
            Self::Commodity { commodity, .. } => commodity.label(),
            Self::Ruin(axis) => axis.label(),
            Self::Xp => "XP".to_string(),
            Self::CreativeSolutions => "Creative Solutions".to_string(),
            Self::SupernaturalSolutions => "Supernatural Solutions".to_string(),
        };
        if self.is_next() {
            format!("{base} next turn")
        } else {
            base
        }
    }

    /// Whether the change lands in a `next` buffer.
    pub fn is_next(self) -> bool {
        matches!(
            self,
            Self::ResourcePointsNext
                | Self::ResourceDiceNext
                | Self::FameNext
                | Self::Commodity { next: true, .. }
        )
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl FromStr for Resource {
    type Err = KmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (base, next) = match trimmed.strip_suffix("-next") {
            Some(base) => (base, true),
            None => (trimmed, false),
        };
        let unknown = || KmError::UnknownName {
            kind: "resource",
            name: s.to_string(),
        };
        let fixed = match (normalize(base).as_str(), next) {
            ("unrest", false) => Some(Self::Unrest),
            ("rp" | "resourcepoints", false) => Some(Self::ResourcePoints),
            ("rp" | "resourcepoints", true) => Some(Self::ResourcePointsNext),
            ("resourcedice", false) => Some(Self::ResourceDice),
            ("resourcedice", true) => Some(Self::ResourceDiceNext),
            ("fame", false) => Some(Self::Fame),
            ("fame", true) => Some(Self::FameNext),
            ("xp", false) => Some(Self::Xp),
            ("creativesolutions", false) => Some(Self::CreativeSolutions),
            ("supernaturalsolutions", false) => Some(Self::SupernaturalSolutions),
            _ => None,
        };
        if let Some(resource) = fixed {
            return Ok(resource);
        }
        if let Ok(commodity) = base.parse::<Commodity>() {
            return Ok(Self::Commodity { commodity, next });
        }
        if next {
            return Err(unknown());
        }
        base.parse::<RuinAxis>().map(Self::Ruin).map_err(|_| unknown())
    }
}

impl TryFrom<String> for Resource {
    type Error = KmError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Resource> for String {
    fn from(value: Resource) -> Self {
        value.as_string()
    }
}

/// How much of a resource changes hands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    /// A fixed number.
    Fixed(i32),
    /// A dice formula rolled when the change is applied.
    Dice(String),
}

impl Amount {
    /// Resolve the amount, rolling if needed.
    pub fn resolve<R: DiceRoller + ?Sized>(&self, roller: &mut R) -> MechResult<i32> {
        match self {
            Self::Fixed(value) => Ok(*value),
            Self::Dice(formula) => {
                let formula: Formula = formula.parse()?;
                Ok(formula.roll(roller)?.total)
            }
        }
    }
}

impl From<i32> for Amount {
    fn from(value: i32) -> Self {
        Self::Fixed(value)
    }
}

impl From<&str> for Amount {
    fn from(value: &str) -> Self {
        Self::Dice(value.to_string())
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(value) => write!(f, "{value}"),
            Self::Dice(formula) => f.write_str(formula),
        }
    }
}

/// Whether a change adds or removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeMode {
    /// Add to the resource.
    Gain,
    /// Remove from the resource.
    Lose,
}

/// A gain or lose button attached to an outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceChange {
    /// The resource changed.
    pub resource: Resource,
    /// How much.
    pub amount: Amount,
    /// Direction.
    pub mode: ChangeMode,
}

impl ResourceChange {
    /// Add `amount` of `resource`.
    pub fn gain(resource: Resource, amount: impl Into<Amount>) -> Self {
        Self {
            resource,
            amount: amount.into(),
            mode: ChangeMode::Gain,
        }
    }

    /// Remove `amount` of `resource`.
    pub fn lose(resource: Resource, amount: impl Into<Amount>) -> Self {
        Self {
            resource,
            amount: amount.into(),
            mode: ChangeMode::Lose,
        }
    }

    /// Roll the amount and return it signed by the mode.
    pub fn signed_amount<R: DiceRoller + ?Sized>(&self, roller: &mut R) -> MechResult<i32> {
        let amount = self.amount.resolve(roller)?;
        Ok(match self.mode {
            ChangeMode::Gain => amount,
            ChangeMode::Lose => -amount,
        })
    }

    /// Button label, e.g. `Gain 1d4 Food`.
    pub fn label(&self) -> String {
        let verb = match self.mode {
            ChangeMode::Gain => "Gain",
            ChangeMode::Lose => "Lose",
        };
        format!("{verb} {} {}", self.amount, self.resource.label())
    }
}

/// The scripted outcome of an activity at one degree of success.
#[derive(Debug, Clone, Copy)]
pub struct ActivityResult {
    /// Outcome text.
    pub message: &'static str,
    /// Modifiers the outcome offers, computed from live kingdom state.
    pub modifiers: Option<fn(&Kingdom) -> Vec<Modifier>>,
    /// Resource changes the outcome offers.
    pub changes: Option<fn(&Kingdom) -> Vec<ResourceChange>>,
    /// Whether the offered modifiers are spent by the first check they
    /// join.
    pub single_use: bool,
}

impl ActivityResult {
    const fn msg(message: &'static str) -> Self {
        Self {
            message,
            modifiers: None,
            changes: None,
            single_use: false,
        }
    }

    fn modifiers(mut self, f: fn(&Kingdom) -> Vec<Modifier>) -> Self {
        self.modifiers = Some(f);
        self
    }

    fn single_use(mut self) -> Self {
        self.single_use = true;
        self
    }

    fn changes(mut self, f: fn(&Kingdom) -> Vec<ResourceChange>) -> Self {
        self.changes = Some(f);
        self
    }

    /// Offered modifiers for this kingdom.
    pub fn modifiers_for(&self, kingdom: &Kingdom) -> Vec<Modifier> {
        self.modifiers.map(|f| f(kingdom)).unwrap_or_default()
    }

    /// Offered resource changes for this kingdom.
    pub fn changes_for(&self, kingdom: &Kingdom) -> Vec<ResourceChange> {
        self.changes.map(|f| f(kingdom)).unwrap_or_default()
    }
}

fn circumstance(name: &str, value: i32, ability: Ability, turns: u32) -> Modifier {
    Modifier::new(name, ModifierType::Circumstance, value)
        .for_abilities(&[ability])
        .with_turns(turns)
}

fn gain_unrest(amount: impl Into<Amount>) -> Vec<ResourceChange> {
    vec![ResourceChange::gain(Resource::Unrest, amount)]
}

fn lose_unrest(amount: impl Into<Amount>) -> Vec<ResourceChange> {
    vec![ResourceChange::lose(Resource::Unrest, amount)]
}

/// The item bonus that offsets the kingdom's worst ruin penalty for a turn.
fn care_for_worst_ruin(kingdom: &Kingdom) -> Vec<Modifier> {
    let worst = RuinAxis::ALL
        .iter()
        .copied()
        .map(|axis| (axis, kingdom.ruin.get(axis).penalty))
        .filter(|(_, penalty)| *penalty > 0)
        .max_by_key(|(_, penalty)| *penalty);
    worst
        .map(|(axis, penalty)| {
            vec![
                Modifier::new("Provide Care", ModifierType::Item, penalty)
                    .for_abilities(&[axis.ability()])
                    .with_turns(1),
            ]
        })
        .unwrap_or_default()
}

fn trade_agreements(kingdom: &Kingdom) -> i32 {
    i32::try_from(kingdom.trade_agreements()).unwrap_or(i32::MAX)
}

/// Look up the scripted outcome of `activity` at `degree`.
pub fn activity_result(activity: Activity, degree: DegreeOfSuccess) -> ActivityResult {
    use Activity::*;
    use DegreeOfSuccess::*;
    type R = ActivityResult;

    match (activity, degree) {
        (AbandonHex, CriticalSuccess) => {
            R::msg("You abandon the hex in good order. Reduce Size by 1; the settlers resettle elsewhere.")
                .changes(|_| gain_unrest(1))
        }
        (AbandonHex, Success) => {
            R::msg("You abandon the hex. Reduce Size by 1; the displaced citizens grumble.")
                .changes(|_| gain_unrest(2))
        }
        (AbandonHex, Failure) => {
            R::msg("You abandon the hex, but the evacuation is chaotic. Reduce Size by 1.")
                .changes(|_| gain_unrest(4))
        }
        (AbandonHex, CriticalFailure) => R::msg(
            "The withdrawal turns into a rout. Reduce Size by 1, and the shaken populace hampers the rest of the region phase.",
        )
        .changes(|_| gain_unrest(4))
        .modifiers(|_| {
            vec![
                Modifier::new("Abandoned Hex", ModifierType::Status, -1)
                    .in_phases(&[KingdomPhase::Region])
                    .with_turns(1),
            ]
        }),

        (BuildRoads, CriticalSuccess) => {
            R::msg("Roads are built through the hex and one adjacent claimed hex that has none.")
        }
        (BuildRoads, Success) => R::msg("Roads are built through the hex."),
        (BuildRoads, Failure) => R::msg("The road crews make no progress this turn."),
        (BuildRoads, CriticalFailure) => {
            R::msg("Accidents on the road works cost lives. No roads are built.")
                .changes(|_| gain_unrest(1))
        }

        (ClaimHex, CriticalSuccess) => R::msg(
            "You claim the hex and increase Size by 1. Your settlers are energized; Stability-based checks gain a bonus for the rest of the turn.",
        )
        .modifiers(|_| vec![circumstance("Claim Hex", 2, Ability::Stability, 1)]),
        (ClaimHex, Success) => R::msg("You claim the hex and increase Size by 1."),
        (ClaimHex, Failure) => R::msg("You fail to claim the hex."),
        (ClaimHex, CriticalFailure) => R::msg(
            "You fail to claim the hex, and the settlers' losses weigh on Stability-based checks until the end of next turn.",
        )
        .modifiers(|_| vec![circumstance("Failed Claim", -1, Ability::Stability, 2)]),

        (EstablishWorkSite, CriticalSuccess) => R::msg(
            "The work site is established and produces from this turn on. The early start earns the kingdom 1 RP.",
        )
        .changes(|_| vec![ResourceChange::gain(Resource::ResourcePoints, 1)]),
        (EstablishWorkSite, Success) => R::msg("The work site is established."),
        (EstablishWorkSite, Failure) => R::msg("The workers fail to establish the site."),
        (EstablishWorkSite, CriticalFailure) => {
            R::msg("An accident at the site kills several workers. The work site is not established.")
                .changes(|_| gain_unrest(1))
        }

        (FortifyHex, CriticalSuccess) => {
            R::msg("The fortification is raised and the locals feel safer for it.")
                .changes(|_| lose_unrest(1))
        }
        (FortifyHex, Success) => R::msg("The fortification is raised."),
        (FortifyHex, Failure) => R::msg("The fortification is not finished this turn."),
        (FortifyHex, CriticalFailure) => {
            R::msg("The works collapse and the workers blame the leadership.")
                .changes(|_| gain_unrest(1))
        }

        (GoFishing, CriticalSuccess) => R::msg("The nets come back full.")
            .changes(|_| vec![ResourceChange::gain(Resource::commodity(Commodity::Food), "1d4")]),
        (GoFishing, Success) => R::msg("The fishers bring in a modest catch.")
            .changes(|_| vec![ResourceChange::gain(Resource::commodity(Commodity::Food), 1)]),
        (GoFishing, Failure) => R::msg("The fishers return empty-handed."),
        (GoFishing, CriticalFailure) => {
            R::msg("A boat is lost with its crew.").changes(|_| gain_unrest(1))
        }

        (GatherLivestock, CriticalSuccess) => R::msg("Hunters and herders return with plenty.")
            .changes(|_| vec![ResourceChange::gain(Resource::commodity(Commodity::Food), "1d4")]),
        (GatherLivestock, Success) => R::msg("Hunters and herders return with some food.")
            .changes(|_| vec![ResourceChange::gain(Resource::commodity(Commodity::Food), 1)]),
        (GatherLivestock, Failure) => R::msg("The hunt finds nothing."),
        (GatherLivestock, CriticalFailure) => {
            R::msg("Predators and disease thin the herds.").changes(|_| gain_unrest(1))
        }

        (CollectTaxes, CriticalSuccess) => R::msg(
            "Taxes flow in without complaint. Economy-based checks gain a bonus for the rest of the turn.",
        )
        .modifiers(|_| vec![circumstance("Collect Taxes", 2, Ability::Economy, 1)]),
        (CollectTaxes, Success) => R::msg(
            "You collect the taxes. Economy-based checks gain a bonus for the rest of the turn.",
        )
        .modifiers(|_| vec![circumstance("Collect Taxes", 1, Ability::Economy, 1)]),
        (CollectTaxes, Failure) => R::msg(
            "You collect the taxes, but the citizens resent it. Economy-based checks gain a bonus for the rest of the turn.",
        )
        .modifiers(|_| vec![circumstance("Collect Taxes", 1, Ability::Economy, 1)])
        .changes(|_| gain_unrest(1)),
        (CollectTaxes, CriticalFailure) => {
            R::msg("The tax collectors are run out of town.").changes(|_| gain_unrest(2))
        }

        (ImproveLifestyle, CriticalSuccess) => R::msg(
            "The citizens enjoy the good life. Culture-based checks gain a bonus for the rest of the turn.",
        )
        .modifiers(|_| vec![circumstance("Improve Lifestyle", 2, Ability::Culture, 1)]),
        (ImproveLifestyle, Success) => R::msg(
            "The citizens appreciate the effort. Culture-based checks gain a bonus for the rest of the turn.",
        )
        .modifiers(|_| vec![circumstance("Improve Lifestyle", 1, Ability::Culture, 1)]),
        (ImproveLifestyle, Failure) => R::msg(
            "The improvements cost more than planned. Culture-based checks still gain a bonus for the rest of the turn.",
        )
        .modifiers(|_| vec![circumstance("Improve Lifestyle", 1, Ability::Culture, 1)])
        .changes(|_| vec![ResourceChange::lose(Resource::ResourcePoints, "1d4")]),
        (ImproveLifestyle, CriticalFailure) => {
            R::msg("The treasury is squandered and graft follows the money.").changes(|_| {
                vec![
                    ResourceChange::lose(Resource::ResourcePoints, "1d4"),
                    ResourceChange::gain(Resource::Ruin(RuinAxis::Crime), 1),
                ]
            })
        }

        (TradeCommodities, CriticalSuccess) => {
            R::msg("Merchants pay a premium for the goods.")
                .changes(|_| vec![ResourceChange::gain(Resource::ResourceDiceNext, 2)])
        }
        (TradeCommodities, Success) => R::msg("The goods sell at a fair price.")
            .changes(|_| vec![ResourceChange::gain(Resource::ResourceDiceNext, 1)]),
        (TradeCommodities, Failure) => R::msg("No buyer is found; the goods are lost in transit."),
        (TradeCommodities, CriticalFailure) => {
            R::msg("The caravan is robbed on the road.").changes(|_| gain_unrest(1))
        }

        (ManageTradeAgreements, CriticalSuccess) => {
            R::msg("Every trade partner deals generously.").changes(|k| {
                vec![ResourceChange::gain(Resource::ResourceDiceNext, 2 * trade_agreements(k))]
            })
        }
        (ManageTradeAgreements, Success) => R::msg("The trade agreements pay out.").changes(|k| {
            vec![ResourceChange::gain(Resource::ResourceDiceNext, trade_agreements(k))]
        }),
        (ManageTradeAgreements, Failure) => R::msg("The trade partners stall this turn."),
        (ManageTradeAgreements, CriticalFailure) => {
            R::msg("A dispute with the trade partners costs the kingdom.").changes(|k| {
                vec![ResourceChange::lose(Resource::ResourcePoints, trade_agreements(k))]
            })
        }

        (CelebrateHoliday, CriticalSuccess) => R::msg(
            "The festival is a triumph. Loyalty-based checks gain a bonus until the end of next turn.",
        )
        .modifiers(|_| vec![circumstance("Celebrate Holiday", 2, Ability::Loyalty, 2)]),
        (CelebrateHoliday, Success) => R::msg(
            "The festival is enjoyed by all. Loyalty-based checks gain a bonus until the end of next turn.",
        )
        .modifiers(|_| vec![circumstance("Celebrate Holiday", 1, Ability::Loyalty, 2)]),
        (CelebrateHoliday, Failure) => R::msg("The festival is a lackluster affair.")
            .changes(|_| vec![ResourceChange::lose(Resource::ResourcePoints, 1)]),
        (CelebrateHoliday, CriticalFailure) => {
            R::msg("The festival is a disaster that costs money and goodwill.").changes(|_| {
                vec![
                    ResourceChange::lose(Resource::ResourcePoints, "1d4"),
                    ResourceChange::gain(Resource::Unrest, 1),
                ]
            })
        }

        (CreativeSolution, CriticalSuccess) => R::msg(
            "Your scholars find a brilliant solution. Bank a creative solution; using it also earns XP.",
        )
        .changes(|_| {
            vec![
                ResourceChange::gain(Resource::CreativeSolutions, 1),
                ResourceChange::gain(Resource::Xp, 10),
            ]
        }),
        (CreativeSolution, Success) => R::msg("Your scholars find a solution. Bank a creative solution.")
            .changes(|_| vec![ResourceChange::gain(Resource::CreativeSolutions, 1)]),
        (CreativeSolution, Failure) => R::msg("The research leads nowhere."),
        (CreativeSolution, CriticalFailure) => {
            R::msg("The research is a costly boondoggle.").changes(|_| {
                vec![ResourceChange::gain(Resource::Ruin(RuinAxis::Corruption), 1)]
            })
        }

        (SupernaturalSolution, CriticalSuccess) => R::msg(
            "The spellcasters find a potent answer. Bank a supernatural solution; using it also earns XP.",
        )
        .changes(|_| {
            vec![
                ResourceChange::gain(Resource::SupernaturalSolutions, 1),
                ResourceChange::gain(Resource::Xp, 10),
            ]
        }),
        (SupernaturalSolution, Success) => {
            R::msg("The spellcasters find an answer. Bank a supernatural solution.")
                .changes(|_| vec![ResourceChange::gain(Resource::SupernaturalSolutions, 1)])
        }
        (SupernaturalSolution, Failure) => R::msg("The rituals reveal nothing."),
        (SupernaturalSolution, CriticalFailure) => {
            R::msg("A ritual goes wrong; the spellcasters can not try again for 1d4 turns.")
                .changes(|_| vec![ResourceChange::lose(Resource::ResourcePoints, "1d4")])
        }

        (Prognostication, CriticalSuccess) => {
            R::msg("The omens are clear. Event checks this turn gain a bonus.").modifiers(|_| {
                vec![
                    Modifier::new("Prognostication", ModifierType::Circumstance, 2)
                        .in_phases(&[KingdomPhase::Event])
                        .with_turns(1),
                ]
            })
        }
        (Prognostication, Success) => {
            R::msg("The omens hint at what is coming. Event checks this turn gain a bonus.")
                .modifiers(|_| {
                    vec![
                        Modifier::new("Prognostication", ModifierType::Circumstance, 1)
                            .in_phases(&[KingdomPhase::Event])
                            .with_turns(1),
                    ]
                })
        }
        (Prognostication, Failure) => R::msg("The omens are unreadable."),
        (Prognostication, CriticalFailure) => {
            R::msg("The omens are misread. Event checks this turn suffer a penalty.").modifiers(|_| {
                vec![
                    Modifier::new("Prognostication", ModifierType::Circumstance, -1)
                        .in_phases(&[KingdomPhase::Event])
                        .with_turns(1),
                ]
            })
        }

        (ProvideCare, CriticalSuccess) => R::msg(
            "The kingdom's poor are cared for. Unrest falls and the worst ruin weighs less this turn.",
        )
        .changes(|_| lose_unrest(1))
        .modifiers(care_for_worst_ruin),
        (ProvideCare, Success) => R::msg("The kingdom's poor are cared for.")
            .changes(|_| lose_unrest(1)),
        (ProvideCare, Failure) => R::msg("The care does not reach those who need it."),
        (ProvideCare, CriticalFailure) => {
            R::msg("The relief effort is mismanaged and breeds resentment.")
                .changes(|_| gain_unrest(1))
        }

        (QuellUnrest, CriticalSuccess) => R::msg("The populace is calmed.")
            .changes(|_| lose_unrest("1d6")),
        (QuellUnrest, Success) => R::msg("The populace calms somewhat.")
            .changes(|_| lose_unrest("1d4")),
        (QuellUnrest, Failure) => R::msg("Your efforts barely register.")
            .changes(|_| lose_unrest(1)),
        (QuellUnrest, CriticalFailure) => {
            R::msg("Your heavy hand inflames the populace.").changes(|_| gain_unrest("1d4"))
        }

        (RequestForeignAid, CriticalSuccess) => R::msg(
            "Your ally sends generous aid. Take the resource dice, or bank the help for one check this turn.",
        )
        .changes(|_| vec![ResourceChange::gain(Resource::ResourceDiceNext, 2)])
        .modifiers(|_| {
            vec![
                Modifier::new("Foreign Aid", ModifierType::Circumstance, 4).with_turns(1),
            ]
        })
        .single_use(),
        (RequestForeignAid, Success) => R::msg(
            "Your ally sends aid. Take the resource die, or bank the help for one check this turn.",
        )
        .changes(|_| vec![ResourceChange::gain(Resource::ResourceDiceNext, 1)])
        .modifiers(|_| {
            vec![
                Modifier::new("Foreign Aid", ModifierType::Circumstance, 2).with_turns(1),
            ]
        })
        .single_use(),
        (RequestForeignAid, Failure) => R::msg("Your ally has nothing to spare."),
        (RequestForeignAid, CriticalFailure) => {
            R::msg("Your ally is insulted by the request.").changes(|_| gain_unrest("1d4"))
        }

        (RestAndRelax, CriticalSuccess) => R::msg("The kingdom rests and recovers.")
            .changes(|_| lose_unrest(2)),
        (RestAndRelax, Success) => R::msg("The kingdom rests.").changes(|_| lose_unrest(1)),
        (RestAndRelax, Failure) => R::msg("The rest does little good."),
        (RestAndRelax, CriticalFailure) => {
            R::msg("Idle hands find trouble.").changes(|_| gain_unrest(1))
        }

        (EstablishTradeAgreement, CriticalSuccess) => R::msg(
            "The group eagerly agrees. A trade agreement is established and the first shipment arrives next turn.",
        )
        .changes(|_| vec![ResourceChange::gain(Resource::ResourceDiceNext, 1)]),
        (EstablishTradeAgreement, Success) => R::msg("A trade agreement is established."),
        (EstablishTradeAgreement, Failure) => R::msg("The group declines for now."),
        (EstablishTradeAgreement, CriticalFailure) => {
            R::msg("The envoys cause a diplomatic incident.").changes(|_| gain_unrest(1))
        }

        (BuildStructure, CriticalSuccess) => R::msg(
            "The structure is built ahead of schedule and half of its commodity cost is refunded.",
        ),
        (BuildStructure, Success) => R::msg("The structure is built."),
        (BuildStructure, Failure) => {
            R::msg("Construction stalls. The spent resources remain committed for a later attempt.")
        }
        (BuildStructure, CriticalFailure) => {
            R::msg("The construction site collapses and the materials are lost.")
                .changes(|_| gain_unrest(1))
        }

        (EstablishSettlement, _) => R::msg("A new settlement is founded in the hex."),
    }
}

/// Outcome of a plain skill check with no activity.
pub fn skill_check_result(degree: DegreeOfSuccess) -> ActivityResult {
    ActivityResult::msg(match degree {
        DegreeOfSuccess::CriticalSuccess => "Critical success.",
        DegreeOfSuccess::Success => "Success.",
        DegreeOfSuccess::Failure => "Failure.",
        DegreeOfSuccess::CriticalFailure => "Critical failure.",
    })
}

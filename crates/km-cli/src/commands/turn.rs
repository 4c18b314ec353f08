use km_core::RuinAxis;
use km_engine::{Command, HexFeature, XpSource};
use km_mechanics::{Amount, Formula, Resource, ResourceChange};

use super::parse;
use crate::session::Session;

pub fn end_turn(session: &mut Session) -> Result<(), String> {
    session.run(Command::EndTurn)
}

pub fn collect(session: &mut Session) -> Result<(), String> {
    session.run(Command::CollectResources)
}

pub fn pay_consumption(session: &mut Session) -> Result<(), String> {
    session.run(Command::PayConsumption)
}

pub fn adjust_unrest(session: &mut Session) -> Result<(), String> {
    session.run(Command::AdjustUnrest)
}

pub fn check_event(session: &mut Session) -> Result<(), String> {
    session.run(Command::CheckForEvent)
}

pub fn reduce_unrest(session: &mut Session) -> Result<(), String> {
    session.run(Command::ReduceUnrest)
}

pub fn reduce_ruin(session: &mut Session, axis: &str) -> Result<(), String> {
    let axis: RuinAxis = parse(axis)?;
    session.run(Command::ReduceRuin(axis))
}

pub fn fame(session: &mut Session, amount: i32) -> Result<(), String> {
    session.run(Command::GainFame(amount))
}

pub fn xp(session: &mut Session, source: XpSource) -> Result<(), String> {
    session.run(Command::IncreaseXp(source))
}

pub fn level_up(session: &mut Session) -> Result<(), String> {
    session.run(Command::LevelUp)
}

pub fn claim_feature(session: &mut Session, feature: &str) -> Result<(), String> {
    let feature: HexFeature = parse(feature)?;
    session.run(Command::ClaimedHexFeature(feature))
}

fn parse_amount(text: &str) -> Result<Amount, String> {
    if let Ok(value) = text.trim().parse::<i32>() {
        return Ok(Amount::Fixed(value));
    }
    // validate the formula now rather than when it is rolled
    parse::<Formula>(text)?;
    Ok(Amount::Dice(text.trim().to_string()))
}

pub fn apply_change(
    session: &mut Session,
    gain: bool,
    resource: &str,
    amount: &str,
) -> Result<(), String> {
    let resource: Resource = parse(resource)?;
    let amount = parse_amount(amount)?;
    let change = if gain {
        ResourceChange::gain(resource, amount)
    } else {
        ResourceChange::lose(resource, amount)
    };
    session.run(Command::ApplyChange(change))
}

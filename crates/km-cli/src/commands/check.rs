use std::collections::BTreeMap;

use km_core::{Activity, KingdomPhase, ModifierType, Skill};
use km_engine::Command;
use km_mechanics::{CheckRequest, RollMode};

use super::parse;
use crate::RollArgs;
use crate::session::Session;

fn parse_bonus(text: &str) -> Result<(ModifierType, i32), String> {
    let (kind, value) = text
        .split_once(':')
        .ok_or_else(|| format!("expected TYPE:VALUE, got \"{text}\""))?;
    let value: i32 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid modifier value in \"{text}\""))?;
    Ok((parse(kind)?, value))
}

fn build(request: CheckRequest, args: &RollArgs) -> Result<CheckRequest, String> {
    let phase: Option<KingdomPhase> = args.phase.as_deref().map(parse).transpose()?;
    let mode = if args.assurance {
        RollMode::Assurance
    } else {
        RollMode::Standard
    };
    let mut overrides = BTreeMap::new();
    for id in &args.disable {
        overrides.insert(id.clone(), false);
    }
    for id in &args.enable {
        overrides.insert(id.clone(), true);
    }
    let mut request = request
        .with_dc(args.dc)
        .with_mode(mode)
        .with_overrides(overrides);
    if phase.is_some() {
        request = request.with_phase(phase);
    }
    for bonus in &args.bonuses {
        let (kind, value) = parse_bonus(bonus)?;
        request = request.with_custom(kind, value);
    }
    Ok(request)
}

pub fn skill(session: &mut Session, skill: &str, args: &RollArgs) -> Result<(), String> {
    let skill: Skill = parse(skill)?;
    let request = build(CheckRequest::skill(skill), args)?;
    session.run(Command::RollCheck(request))
}

pub fn activity(
    session: &mut Session,
    activity: &str,
    skill: Option<&str>,
    args: &RollArgs,
) -> Result<(), String> {
    let activity: Activity = parse(activity)?;
    let skill: Option<Skill> = skill.map(parse).transpose()?;
    let request = build(CheckRequest::activity(activity).with_skill(skill), args)?;
    session.run(Command::RollCheck(request))
}

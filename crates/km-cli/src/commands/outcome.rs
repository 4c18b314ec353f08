use km_engine::Command;
use km_mechanics::{DegreeChange, EffectRef, RerollKind};

use super::parse;
use crate::session::Session;

const NO_CHECK: &str = "no check rolled yet, use `km check` or `km activity` first";

pub fn change_degree(session: &mut Session, up: bool) -> Result<(), String> {
    let outcome = session.last()?.outcome.ok_or(NO_CHECK)?;
    let change = if up {
        DegreeChange::Upgrade
    } else {
        DegreeChange::Downgrade
    };
    session.run(Command::ChangeDegree {
        meta: outcome.meta(),
        change,
    })
}

pub fn apply_effect(session: &mut Session, effect: &str) -> Result<(), String> {
    let effect: EffectRef = parse(effect)?;
    let outcome = session.last()?.outcome.ok_or(NO_CHECK)?;
    session.run(Command::ApplyEffect {
        meta: outcome.meta(),
        effect,
    })
}

pub fn reroll(session: &mut Session, kind: &str) -> Result<(), String> {
    let kind: RerollKind = parse(kind)?;
    let meta = session.last()?.roll.ok_or(NO_CHECK)?;
    session.run(Command::Reroll { meta, kind })
}

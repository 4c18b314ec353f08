//! Printing effects and outcomes.

use colored::{ColoredString, Colorize};
use km_engine::Effect;
use km_mechanics::{ActivityOutcome, DegreeOfSuccess, EffectRef};

pub fn degree(degree: DegreeOfSuccess) -> ColoredString {
    let label = degree.label();
    match degree {
        DegreeOfSuccess::CriticalSuccess => label.green().bold(),
        DegreeOfSuccess::Success => label.green(),
        DegreeOfSuccess::Failure => label.red(),
        DegreeOfSuccess::CriticalFailure => label.red().bold(),
    }
}

pub fn signed(value: i32) -> String {
    format!("{value:+}")
}

fn effect_label(outcome: &ActivityOutcome, effect: EffectRef) -> String {
    match effect {
        EffectRef::Modifier(index) => outcome
            .modifiers
            .get(index)
            .map(|m| format!("Add {}", m.label()))
            .unwrap_or_default(),
        EffectRef::Change(index) => outcome
            .changes
            .get(index)
            .map(|c| c.label())
            .unwrap_or_default(),
        EffectRef::Fame => "Gain 1 Fame".to_string(),
    }
}

pub fn print_outcome(outcome: &ActivityOutcome) {
    println!("  {}", outcome.message);
    let effects = outcome.effects();
    if effects.is_empty() {
        return;
    }
    println!();
    for effect in effects {
        println!(
            "    {} {}",
            format!("[{effect}]").cyan(),
            effect_label(outcome, effect)
        );
    }
    println!(
        "  {}",
        "Apply with `km apply-effect <effect>`.".dimmed()
    );
}

pub fn print_effects(effects: &[Effect]) {
    for effect in effects {
        match effect {
            Effect::Check { result, outcome } => {
                let meta = &result.meta;
                println!(
                    "  {} {} vs DC {}: {}",
                    format!("{}:", meta.label()).bold(),
                    meta.total,
                    meta.dc,
                    degree(meta.degree)
                );
                println!(
                    "  {}",
                    format!("{} (natural {})", meta.formula, result.natural).dimmed()
                );
                print_outcome(outcome);
            }
            Effect::Outcome { outcome } => {
                println!("  {}", degree(outcome.degree));
                print_outcome(outcome);
            }
            Effect::Offer { change } => {
                println!("  {} {}", "offer:".cyan(), change.label());
            }
            Effect::AlreadyConsumed { .. } => println!("  {}", effect.to_string().yellow()),
            Effect::RuinTriggered { .. } | Effect::HexLost | Effect::Anarchy { .. } => {
                println!("  {}", effect.to_string().red().bold());
            }
            Effect::EventOccurs => println!("  {}", effect.to_string().yellow().bold()),
            Effect::Rolled { .. } => println!("  {}", effect.to_string().dimmed()),
            Effect::Notice { .. } | Effect::XpGained { .. } => println!("  {effect}"),
        }
    }
}

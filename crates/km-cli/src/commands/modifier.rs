use comfy_table::{ContentArrangement, Table};
use km_core::{Ability, Activity, KingdomPhase, Modifier, ModifierType, Skill};
use km_engine::Command;

use super::{parse, parse_all};
use crate::session::Session;

/// Arguments of `modifier add`.
pub struct NewModifier {
    pub name: String,
    pub kind: String,
    pub value: i32,
    pub turns: Option<u32>,
    pub abilities: Vec<String>,
    pub skills: Vec<String>,
    pub phases: Vec<String>,
    pub activities: Vec<String>,
}

pub fn add(session: &mut Session, new: NewModifier) -> Result<(), String> {
    let kind: ModifierType = parse(&new.kind)?;
    let mut modifier = Modifier::new(new.name, kind, new.value);
    if let Some(turns) = new.turns {
        modifier = modifier.with_turns(turns);
    }
    let abilities: Vec<Ability> = parse_all(&new.abilities)?;
    if !abilities.is_empty() {
        modifier = modifier.for_abilities(&abilities);
    }
    let skills: Vec<Skill> = parse_all(&new.skills)?;
    if !skills.is_empty() {
        modifier = modifier.for_skills(&skills);
    }
    let phases: Vec<KingdomPhase> = parse_all(&new.phases)?;
    if !phases.is_empty() {
        modifier = modifier.in_phases(&phases);
    }
    let activities: Vec<Activity> = parse_all(&new.activities)?;
    if !activities.is_empty() {
        modifier = modifier.for_activities(&activities);
    }
    let label = modifier.label();
    session.execute(Command::AddModifier(modifier))?;
    println!("  Added {label}");
    Ok(())
}

pub fn remove(session: &mut Session, index: usize) -> Result<(), String> {
    let kingdom = session.kingdom()?;
    let label = kingdom
        .modifiers
        .get(index)
        .map(Modifier::label)
        .unwrap_or_default();
    session.execute(Command::RemoveModifier(index))?;
    println!("  Removed {label}");
    Ok(())
}

fn limits(modifier: &Modifier) -> String {
    let mut parts = Vec::new();
    if let Some(abilities) = &modifier.abilities {
        parts.extend(abilities.iter().map(|a| a.label()));
    }
    if let Some(skills) = &modifier.skills {
        parts.extend(skills.iter().map(|s| s.label()));
    }
    if let Some(phases) = &modifier.phases {
        parts.extend(phases.iter().map(|p| format!("{} phase", p.label())));
    }
    if let Some(activities) = &modifier.activities {
        parts.extend(activities.iter().map(|a| a.label()));
    }
    if parts.is_empty() {
        "all checks".to_string()
    } else {
        parts.join(", ")
    }
}

pub fn list(session: &Session) -> Result<(), String> {
    let kingdom = session.kingdom()?;
    if kingdom.modifiers.is_empty() {
        println!("  No active modifiers.");
        return Ok(());
    }
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Name", "Type", "Value", "Applies to", "Turns"]);
    for (index, modifier) in kingdom.modifiers.iter().enumerate() {
        let name = if modifier.enabled {
            modifier.name.clone()
        } else {
            format!("{} (disabled)", modifier.name)
        };
        table.add_row(vec![
            index.to_string(),
            name,
            modifier.kind.label(),
            format!("{:+}", modifier.value),
            limits(modifier),
            modifier
                .turns
                .map_or_else(|| "-".to_string(), |t| t.to_string()),
        ]);
    }
    println!("{table}");
    Ok(())
}

use km_core::{Activity, KingdomPatch};
use km_engine::Command;

use super::parse_all;
use crate::session::Session;

pub fn run(session: &mut Session, patch: &str) -> Result<(), String> {
    let patch: KingdomPatch =
        serde_json::from_str(patch).map_err(|e| format!("invalid kingdom patch: {e}"))?;
    if patch.is_empty() {
        println!("  Nothing to update.");
        return Ok(());
    }
    session.execute(Command::Update(patch))?;
    println!("  Kingdom updated");
    Ok(())
}

pub fn blacklist(session: &mut Session, activities: &[String]) -> Result<(), String> {
    let activities: Vec<Activity> = parse_all(activities)?;
    let labels: Vec<String> = activities.iter().map(|a| a.label()).collect();
    session.execute(Command::SetBlacklist(activities))?;
    if labels.is_empty() {
        println!("  Every activity is allowed");
    } else {
        println!("  Blocked: {}", labels.join(", "));
    }
    Ok(())
}

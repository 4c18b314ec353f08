use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use km_core::{Activity, ActivityDc, KingdomPhase, rank_label};

use super::parse;
use crate::session::Session;

pub fn run(session: &Session, phase: Option<&str>) -> Result<(), String> {
    let phase: Option<KingdomPhase> = phase.map(parse).transpose()?;
    let kingdom = session.kingdom()?;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Activity", "Phase", "DC", "Skills", "Status"]);
    for activity in Activity::ALL {
        if phase.is_some_and(|p| p != activity.phase()) {
            continue;
        }
        let dc = match activity.dc() {
            ActivityDc::Control => kingdom.control_dc().to_string(),
            ActivityDc::Custom => "custom".to_string(),
            ActivityDc::None => "-".to_string(),
        };
        let skills: Vec<String> = activity
            .skills()
            .iter()
            .map(|(skill, rank)| {
                if *rank > 0 {
                    format!("{} ({})", skill.label(), rank_label(*rank))
                } else {
                    skill.label()
                }
            })
            .collect();
        let status = if kingdom.activity_blacklist.contains(activity) {
            "blocked".red().to_string()
        } else if !kingdom.activity_available(*activity, session.context()) {
            "locked".yellow().to_string()
        } else if activity.available_skills(&kingdom.skill_ranks).is_empty()
            && !activity.skills().is_empty()
        {
            "untrained".yellow().to_string()
        } else {
            "available".green().to_string()
        };
        table.add_row(vec![
            activity.label(),
            activity.phase().label(),
            dc,
            skills.join(", "),
            status,
        ]);
    }
    println!("{table}");
    Ok(())
}

use comfy_table::{ContentArrangement, Table};
use km_core::rank_label;
use km_mechanics::calculate_skills;

use crate::output::signed;
use crate::session::Session;

pub fn run(session: &Session) -> Result<(), String> {
    let kingdom = session.kingdom()?;
    let settings = session.config().check_settings();
    let skills = calculate_skills(&kingdom, session.context(), &settings);

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Skill", "Ability", "Rank", "Modifier"]);
    for row in &skills {
        table.add_row(vec![
            row.skill.label(),
            row.ability.label(),
            rank_label(row.rank).to_string(),
            signed(row.total.value),
        ]);
    }
    println!("{table}");
    Ok(())
}

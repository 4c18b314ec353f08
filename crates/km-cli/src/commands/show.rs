use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use km_core::{Commodity, RuinAxis};

use crate::session::Session;

fn or_dash(text: &str) -> &str {
    if text.is_empty() { "-" } else { text }
}

pub fn run(session: &Session) -> Result<(), String> {
    let kingdom = session.kingdom()?;
    let ctx = session.context();
    let size = kingdom.size_data();

    let name = if kingdom.name.is_empty() {
        session.id()
    } else {
        kingdom.name.as_str()
    };
    println!(
        "  {} [{}]",
        name.bold(),
        format!("level {} {}", kingdom.level, size.kind.label()).dimmed()
    );
    println!(
        "  charter: {}   government: {}   heartland: {}",
        or_dash(&kingdom.charter),
        or_dash(&kingdom.government),
        kingdom.heartland.label()
    );
    println!();
    println!(
        "  xp:          {} / {}",
        kingdom.xp, kingdom.xp_threshold
    );
    println!("  size:        {} hexes", kingdom.size);
    println!(
        "  control DC:  {}   event DC: {}",
        kingdom.control_dc(),
        kingdom.event_dc()
    );
    let unrest = kingdom.unrest.to_string();
    let unrest = if kingdom.in_anarchy() {
        unrest.red().bold()
    } else {
        unrest.normal()
    };
    println!(
        "  unrest:      {unrest} (anarchy at {})",
        kingdom.anarchy_threshold()
    );
    println!(
        "  {:<12} {} (next turn {})",
        format!("{}:", kingdom.fame.label().to_lowercase()),
        kingdom.fame.now,
        kingdom.fame.next
    );
    println!(
        "  RP:          {} (next turn {})",
        kingdom.resource_points.now, kingdom.resource_points.next
    );
    println!(
        "  resource:    {}{} (bonus {}, next turn {})",
        km_engine::turn::resource_dice_count(&kingdom),
        size.resource_die(),
        kingdom.resource_dice.now,
        kingdom.resource_dice.next
    );
    println!(
        "  consumption: {}",
        kingdom.total_consumption(ctx)
    );
    if kingdom.at_war {
        println!("  {}", "at war".red());
    }

    let capacity = kingdom.commodity_capacity(ctx);
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Commodity", "Now", "Next", "Capacity"]);
    for commodity in Commodity::ALL {
        table.add_row(vec![
            commodity.label(),
            kingdom.commodities.now.get(*commodity).to_string(),
            kingdom.commodities.next.get(*commodity).to_string(),
            capacity.get(*commodity).to_string(),
        ]);
    }
    println!();
    println!("{table}");

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Ruin", "Value", "Threshold", "Penalty"]);
    for axis in RuinAxis::ALL {
        let values = kingdom.ruin.get(*axis);
        table.add_row(vec![
            axis.label(),
            values.value.to_string(),
            values.threshold.to_string(),
            values.penalty.to_string(),
        ]);
    }
    println!("{table}");

    println!();
    let vacancies: Vec<String> = kingdom
        .leaders
        .vacancies()
        .into_iter()
        .map(|leader| leader.label())
        .collect();
    if vacancies.is_empty() {
        println!("  vacancies:   none");
    } else {
        println!("  vacancies:   {}", vacancies.join(", ").yellow());
    }
    println!("  settlements: {}", kingdom.settlements.len());
    println!("  modifiers:   {}", kingdom.modifiers.len());
    if !kingdom.ongoing_events.is_empty() {
        let names: Vec<&str> = kingdom
            .ongoing_events
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        println!("  events:      {}", names.join(", "));
    }
    Ok(())
}

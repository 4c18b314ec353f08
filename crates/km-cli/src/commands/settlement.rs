use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use km_core::{Settlement, SettlementType};
use km_engine::Command;

use crate::session::Session;

/// Arguments of `settlement add`.
pub struct NewSettlement {
    pub id: String,
    pub level: i32,
    pub lots: i32,
    pub capital: bool,
    pub secondary: bool,
    pub water: bool,
}

pub fn add(session: &mut Session, new: NewSettlement) -> Result<(), String> {
    let settlement = Settlement {
        scene_id: new.id,
        level: new.level,
        kind: if new.capital {
            SettlementType::Capital
        } else {
            SettlementType::Settlement
        },
        lots: new.lots,
        secondary_territory: new.secondary,
        water_borders: new.water,
    };
    let label = format!("{} {}", settlement.size_label(), settlement.scene_id);
    session.execute(Command::AddSettlement(settlement))?;
    println!("  Added {label}");
    Ok(())
}

pub fn remove(session: &mut Session, id: String) -> Result<(), String> {
    session.execute(Command::RemoveSettlement(id.clone()))?;
    println!("  Removed {id}");
    Ok(())
}

pub fn activate(session: &mut Session, id: Option<String>) -> Result<(), String> {
    session.execute(Command::SetActiveSettlement(id.clone()))?;
    match id {
        Some(id) => println!("  Leaders now act from {id}"),
        None => println!("  No active settlement"),
    }
    Ok(())
}

pub fn list(session: &Session) -> Result<(), String> {
    let kingdom = session.kingdom()?;
    if kingdom.settlements.is_empty() {
        println!("  No settlements.");
        return Ok(());
    }
    let overcrowded = |s: &Settlement| {
        session
            .context()
            .overcrowded(std::slice::from_ref(s))
            > 0
    };
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Settlement", "Size", "Level", "Lots", "Consumption", "Notes"]);
    for settlement in &kingdom.settlements {
        let mut notes = Vec::new();
        if settlement.kind == SettlementType::Capital {
            notes.push("capital".bold().to_string());
        }
        if kingdom.active_settlement.as_deref() == Some(settlement.scene_id.as_str()) {
            notes.push("active".green().to_string());
        }
        if overcrowded(settlement) {
            notes.push("overcrowded".yellow().to_string());
        }
        if settlement.secondary_territory {
            notes.push("secondary territory".to_string());
        }
        table.add_row(vec![
            settlement.scene_id.clone(),
            settlement.size_label().to_string(),
            settlement.level.to_string(),
            settlement.lots.to_string(),
            settlement.consumption().to_string(),
            notes.join(", "),
        ]);
    }
    println!("{table}");
    Ok(())
}

use colored::Colorize;
use km_core::Kingdom;
use km_engine::Command;

use crate::session::Session;

pub fn run(session: &mut Session, name: Option<String>, force: bool) -> Result<(), String> {
    if session.exists() && !force {
        return Err(format!(
            "kingdom '{}' already exists, use --force to start over",
            session.id()
        ));
    }
    let kingdom = Kingdom {
        name: name.unwrap_or_default(),
        ..Kingdom::default()
    };
    session.replace(&kingdom)?;
    let shown = if kingdom.name.is_empty() {
        session.id().to_string()
    } else {
        kingdom.name.clone()
    };
    println!("  Founded {}", shown.bold());
    println!("  Control DC {}", kingdom.control_dc());
    Ok(())
}

pub fn reset(session: &mut Session) -> Result<(), String> {
    session.run(Command::Reset)
}

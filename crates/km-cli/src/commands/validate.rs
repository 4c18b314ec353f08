use colored::Colorize;
use km_mechanics::validate_kingdom;

use crate::session::Session;

pub fn run(session: &Session) -> Result<(), String> {
    let kingdom = session.kingdom()?;
    let issues = validate_kingdom(&kingdom, session.context());
    if issues.is_empty() {
        println!("  {}", "No issues found.".green());
        return Ok(());
    }
    for issue in &issues {
        let line = issue.to_string();
        if issue.is_error {
            println!("  {}", line.red());
        } else {
            println!("  {}", line.yellow());
        }
    }
    let errors = issues.iter().filter(|i| i.is_error).count();
    if errors > 0 {
        return Err(format!(
            "{} error{} found",
            errors,
            if errors == 1 { "" } else { "s" }
        ));
    }
    Ok(())
}

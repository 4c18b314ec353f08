use chrono::{Local, NaiveDate, NaiveDateTime};
use km_core::calendar::format_world_time;

fn parse_time(text: &str) -> Result<NaiveDateTime, String> {
    let text = text.trim();
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(time) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(time);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| format!("invalid date: \"{text}\" (expected YYYY-MM-DD [HH:MM:SS])"))
}

pub fn run(time: Option<&str>) -> Result<(), String> {
    let time = match time {
        Some(text) => parse_time(text)?,
        None => Local::now().naive_local(),
    };
    println!("  {}", format_world_time(&time));
    Ok(())
}

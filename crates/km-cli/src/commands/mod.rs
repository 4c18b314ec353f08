pub mod activities;
pub mod check;
pub mod date;
pub mod init;
pub mod modifier;
pub mod outcome;
pub mod settlement;
pub mod show;
pub mod skills;
pub mod turn;
pub mod update;
pub mod validate;

use std::fmt::Display;
use std::str::FromStr;

/// Parse a keyword argument, e.g. a skill or activity name.
fn parse<T>(text: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: Display,
{
    text.parse().map_err(|e: T::Err| e.to_string())
}

/// Parse every keyword in a list.
fn parse_all<T>(texts: &[String]) -> Result<Vec<T>, String>
where
    T: FromStr,
    T::Err: Display,
{
    texts.iter().map(|t| parse(t)).collect()
}

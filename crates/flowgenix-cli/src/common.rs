//! Shared helpers for command modules.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use flowgenix_core::{App, Config};

use crate::terminal::Terminal;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Open the app on the user's data directory with terminal capabilities.
pub fn open_app() -> Result<App, Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let caps = Terminal::capabilities(&config);
    Ok(App::open(config, caps)?)
}

/// Accepts `YYYY-MM-DD HH:MM` or `YYYY-MM-DDTHH:MM`.
pub fn parse_datetime(input: &str) -> Result<NaiveDateTime, String> {
    let input = input.trim();
    ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .ok_or_else(|| format!("invalid date-time '{input}' (expected YYYY-MM-DD HH:MM)"))
}

pub fn parse_date(input: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{input}' (expected YYYY-MM-DD)"))
}

pub fn parse_time(input: &str) -> Result<NaiveTime, String> {
    let input = input.trim();
    NaiveTime::parse_from_str(input, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M:%S"))
        .map_err(|_| format!("invalid time '{input}' (expected HH:MM)"))
}

pub fn fmt_datetime(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

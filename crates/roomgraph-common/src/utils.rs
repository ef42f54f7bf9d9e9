//! Shared utility functions.

use crate::error::{Result, RoomGraphError};
use chrono::{NaiveTime, TimeZone};
use chrono_tz::Tz;

/// Parses a time of day in `HH:MM` or `HH:MM:SS` form.
pub fn parse_time_of_day(input: &str) -> Result<NaiveTime> {
    let trimmed = input.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|e| {
            RoomGraphError::validation(format!("invalid time of day '{trimmed}': {e}"))
        })
}

/// Parses an IANA time zone name such as `Europe/Berlin`.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|e| RoomGraphError::validation_field(format!("unknown time zone '{name}': {e}"), "timezone"))
}

/// Formats a timestamp for display in chart axes and logs.
pub fn format_timestamp<Z: TimeZone>(timestamp: &chrono::DateTime<Z>) -> String
where
    Z::Offset: std::fmt::Display,
{
    timestamp.format("%Y-%m-%d %H:%M").to_string()
}

/// Makes a string safe to use as a single path component.
pub fn sanitize_path_component(input: &str) -> String {
    let cleaned: String = input
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || "-_.".contains(c) {
                c
            } else {
                '_'
            }
        })
        .collect();

    match cleaned.trim_matches('.') {
        "" => "_".to_string(),
        _ => cleaned,
    }
}

/// Substitutes `{room}` and `{period}` tokens in a template.
pub fn fill_template(template: &str, room: &str, period: Option<&str>) -> String {
    let filled = template.replace("{room}", room);
    match period {
        Some(period) => filled.replace("{period}", period),
        None => filled,
    }
}

/// Truncates a string to a maximum number of characters with ellipsis.
pub fn truncate_string(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        input.to_string()
    } else {
        let kept: String = input.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

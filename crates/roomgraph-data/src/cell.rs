//! Typed table cells and the coercions applied while loading.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use roomgraph_common::ColumnType;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Offset-carrying formats tried after RFC 3339.
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Offset-less formats; these are read as UTC.
const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// One value of a loaded table.
///
/// Parse failures never raise; they become [`Cell::Missing`] and are dropped
/// by the cleaner.
#[derive(Debug, Clone)]
pub enum Cell {
    /// Empty or unparseable.
    Missing,
    /// Free text.
    Text(String),
    /// Finite floating point number.
    Number(f64),
    /// Point in time with its original offset.
    Timestamp(DateTime<FixedOffset>),
}

impl Cell {
    /// Coerces a raw field to the given column type.
    pub fn parse(raw: &str, kind: ColumnType) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Missing;
        }
        match kind {
            ColumnType::Timestamp => parse_timestamp(trimmed).map_or(Self::Missing, Self::Timestamp),
            ColumnType::Numeric => parse_number(trimmed).map_or(Self::Missing, Self::Number),
            ColumnType::Text => Self::Text(trimmed.to_string()),
        }
    }

    /// Re-coerces an already typed cell, parsing text where needed.
    pub fn coerce(self, kind: ColumnType) -> Self {
        match (self, kind) {
            (cell @ Self::Timestamp(_), ColumnType::Timestamp)
            | (cell @ Self::Number(_), ColumnType::Numeric) => cell,
            (Self::Text(text), kind) => Self::parse(&text, kind),
            (Self::Missing, _) => Self::Missing,
            (cell, ColumnType::Text) => Self::Text(cell.to_string()),
            _ => Self::Missing,
        }
    }

    /// Whether the cell holds no value.
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// The timestamp, if this is a timestamp cell.
    pub fn as_timestamp(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// The number, if this is a numeric cell.
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => Ok(()),
            Self::Text(text) => f.write_str(text),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{n:.0}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
        }
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Missing, Self::Missing) => true,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => number_bits(*a) == number_bits(*b),
            (Self::Timestamp(a), Self::Timestamp(b)) => {
                a == b && a.offset().local_minus_utc() == b.offset().local_minus_utc()
            }
            _ => false,
        }
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Missing => {}
            Self::Text(text) => text.hash(state),
            Self::Number(n) => number_bits(*n).hash(state),
            Self::Timestamp(ts) => {
                ts.timestamp().hash(state);
                ts.timestamp_subsec_nanos().hash(state);
                ts.offset().local_minus_utc().hash(state);
            }
        }
    }
}

fn number_bits(n: f64) -> u64 {
    if n == 0.0 {
        0.0_f64.to_bits()
    } else {
        n.to_bits()
    }
}

/// Parses a timestamp in any of the accepted export formats.
///
/// Values without an offset are taken as UTC.
pub fn parse_timestamp(input: &str) -> Option<DateTime<FixedOffset>> {
    let input = input.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Some(ts);
    }
    if let Some(ts) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(input, fmt).ok())
    {
        return Some(ts);
    }
    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;
    Some(Utc.from_utc_datetime(&naive).fixed_offset())
}

/// Parses a finite number; anything else is rejected.
pub fn parse_number(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use std::collections::HashSet;

    #[test]
    fn test_parse_timestamp_formats() {
        let rfc = parse_timestamp("2024-05-17T08:00:00Z").unwrap();
        assert_eq!(rfc.hour(), 8);

        let offset = parse_timestamp("2024-05-17 10:00:00+02:00").unwrap();
        assert_eq!(offset, rfc);

        let naive = parse_timestamp("2024-05-17 08:00:00").unwrap();
        assert_eq!(naive, rfc);
        assert_eq!(naive.offset().local_minus_utc(), 0);

        assert_eq!(parse_timestamp("2024-05-17 08:00").unwrap(), rfc);
        assert_eq!(parse_timestamp("2024-05-17").unwrap().hour(), 0);
        assert!(parse_timestamp("2024-05-17T08:00:00.123456Z").is_some());
    }

    #[test]
    fn test_unparseable_values_become_missing() {
        assert!(Cell::parse("yesterday", ColumnType::Timestamp).is_missing());
        assert!(Cell::parse("n/a", ColumnType::Numeric).is_missing());
        assert!(Cell::parse("NaN", ColumnType::Numeric).is_missing());
        assert!(Cell::parse("inf", ColumnType::Numeric).is_missing());
        assert!(Cell::parse("   ", ColumnType::Text).is_missing());
        assert_eq!(Cell::parse(" 4 ", ColumnType::Numeric), Cell::Number(4.0));
    }

    #[test]
    fn test_coerce_reparses_text() {
        let cell = Cell::Text("12.5".to_string()).coerce(ColumnType::Numeric);
        assert_eq!(cell.as_number(), Some(12.5));

        let cell = Cell::Number(3.0).coerce(ColumnType::Timestamp);
        assert!(cell.is_missing());

        let cell = Cell::Number(625.0).coerce(ColumnType::Text);
        assert_eq!(cell, Cell::Text("625".to_string()));
    }

    #[test]
    fn test_equality_and_hash_for_numbers() {
        let mut set = HashSet::new();
        set.insert(Cell::Number(0.0));
        assert!(!set.insert(Cell::Number(-0.0)));
        assert!(set.insert(Cell::Number(1.0)));
        assert_ne!(Cell::Number(1.0), Cell::Text("1".to_string()));
    }

    #[test]
    fn test_display() {
        assert_eq!(Cell::Number(7.0).to_string(), "7");
        assert_eq!(Cell::Number(7.25).to_string(), "7.25");
        assert_eq!(Cell::Missing.to_string(), "");
    }
}

//! Calendar bucketing of records.

use crate::dataset::Record;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Calendar granularity of a chart group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    /// One calendar day, keyed `YYYY-MM-DD`.
    Day,
    /// One calendar month, keyed `YYYY-MM`.
    Month,
}

impl Period {
    /// Key of the bucket containing `timestamp`, in the timestamp's own offset.
    pub fn key(self, timestamp: &DateTime<FixedOffset>) -> String {
        match self {
            Self::Day => timestamp.format("%Y-%m-%d").to_string(),
            Self::Month => timestamp.format("%Y-%m").to_string(),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day => write!(f, "day"),
            Self::Month => write!(f, "month"),
        }
    }
}

/// Buckets records by period key. Keys sort chronologically and every
/// bucket is non-empty.
pub fn group_by_period<'a>(
    records: &[&'a Record],
    period: Period,
) -> BTreeMap<String, Vec<&'a Record>> {
    let mut groups: BTreeMap<String, Vec<&'a Record>> = BTreeMap::new();
    for &record in records {
        groups
            .entry(period.key(&record.timestamp))
            .or_default()
            .push(record);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ts: &str) -> Record {
        Record {
            timestamp: DateTime::parse_from_rfc3339(ts).unwrap(),
            value: 1.0,
            room: "625".to_string(),
            metadata: Vec::new(),
        }
    }

    #[test]
    fn test_keys() {
        let ts = DateTime::parse_from_rfc3339("2024-05-17T23:30:00-02:00").unwrap();
        assert_eq!(Period::Day.key(&ts), "2024-05-17");
        assert_eq!(Period::Month.key(&ts), "2024-05");
    }

    #[test]
    fn test_groups_by_month() {
        let records = [
            record("2024-04-30T10:00:00Z"),
            record("2024-05-01T10:00:00Z"),
            record("2024-05-31T10:00:00Z"),
        ];
        let refs: Vec<&Record> = records.iter().collect();
        let groups = group_by_period(&refs, Period::Month);

        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["2024-04", "2024-05"]);
        assert_eq!(groups["2024-05"].len(), 2);
    }

    #[test]
    fn test_empty_input_has_no_groups() {
        assert!(group_by_period(&[], Period::Day).is_empty());
    }
}

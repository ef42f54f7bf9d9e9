//! Row cleaning.
//!
//! Steps run in a fixed order since each one relies on the previous having
//! removed invalid rows:
//!
//! 1. re-coerce the timestamp and value columns
//! 2. drop rows with a missing timestamp or value
//! 3. drop rows with any missing cell
//! 4. drop exact duplicates, keeping the first occurrence
//! 5. drop negative values
//! 6. drop values at or beyond the configured quantiles

use crate::cell::Cell;
use crate::dataset::{Dataset, RawDataset, Record};
use crate::stats::{quantile, sorted};
use roomgraph_common::SchemaRoles;
use roomgraph_config::CleaningConfig;
use std::collections::HashSet;
use tracing::{debug, info};

/// Turns a [`RawDataset`] into a [`Dataset`] of complete, unique, plausible
/// records.
#[derive(Debug, Clone)]
pub struct Cleaner {
    lower_quantile: f64,
    upper_quantile: f64,
    trim_outliers: bool,
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new(&CleaningConfig::default())
    }
}

impl Cleaner {
    /// Creates a cleaner from the cleaning section of the configuration.
    pub const fn new(config: &CleaningConfig) -> Self {
        Self {
            lower_quantile: config.lower_quantile,
            upper_quantile: config.upper_quantile,
            trim_outliers: config.trim_outliers,
        }
    }

    /// Cleans the dataset. An input that ends up empty yields an empty
    /// dataset rather than an error.
    pub fn clean(&self, raw: RawDataset) -> Dataset {
        let loaded = raw.len();
        let (schema, roles, rows) = raw.into_parts();
        let kinds: Vec<_> = schema.columns.iter().map(|c| c.kind).collect();

        let rows: Vec<Vec<Cell>> = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .zip(&kinds)
                    .map(|(cell, kind)| cell.coerce(*kind))
                    .collect::<Vec<_>>()
            })
            .filter(|row| !row[roles.timestamp].is_missing() && !row[roles.value].is_missing())
            .collect();
        let with_roles = rows.len();

        let rows: Vec<Vec<Cell>> = rows
            .into_iter()
            .filter(|row| row.iter().all(|cell| !cell.is_missing()))
            .collect();
        let complete = rows.len();

        let mut seen = HashSet::with_capacity(rows.len());
        let rows: Vec<Vec<Cell>> = rows
            .into_iter()
            .filter(|row| seen.insert(row.clone()))
            .collect();
        let unique = rows.len();

        let mut records: Vec<Record> = rows
            .into_iter()
            .filter_map(|row| into_record(row, roles))
            .filter(|record| record.value >= 0.0)
            .collect();
        let non_negative = records.len();

        if self.trim_outliers {
            self.trim(&mut records);
        }

        debug!(
            loaded,
            with_roles, complete, unique, non_negative, "Cleaning steps"
        );
        info!(loaded, kept = records.len(), "Cleaned dataset");
        Dataset::new(schema, records)
    }

    /// Drops records at or below the lower quantile and at or above the upper
    /// quantile of the current value distribution.
    fn trim(&self, records: &mut Vec<Record>) {
        let values = sorted(records.iter().map(|r| r.value));
        let (Some(low), Some(high)) = (
            quantile(&values, self.lower_quantile),
            quantile(&values, self.upper_quantile),
        ) else {
            return;
        };
        debug!(low, high, "Outlier bounds");
        records.retain(|r| r.value > low && r.value < high);
    }
}

fn into_record(row: Vec<Cell>, roles: SchemaRoles) -> Option<Record> {
    let timestamp = row[roles.timestamp].as_timestamp()?;
    let value = row[roles.value].as_number()?;
    let room = row[roles.room].to_string();

    let metadata = row
        .into_iter()
        .enumerate()
        .filter(|(i, _)| *i != roles.timestamp && *i != roles.value && *i != roles.room)
        .map(|(_, cell)| cell)
        .collect();

    Some(Record {
        timestamp,
        value,
        room,
        metadata,
    })
}

//! Raw and cleaned tables.

use crate::cell::Cell;
use chrono::{DateTime, FixedOffset};
use roomgraph_common::{Result, RoomGraphError, Schema, SchemaRoles};
use std::collections::BTreeSet;

/// Loaded table with canonical column names and typed, possibly missing
/// cells. Every row has exactly `schema.len()` cells.
#[derive(Debug, Clone)]
pub struct RawDataset {
    schema: Schema,
    roles: SchemaRoles,
    rows: Vec<Vec<Cell>>,
}

impl RawDataset {
    /// Builds a raw dataset, checking the row width against the schema.
    pub fn new(schema: Schema, rows: Vec<Vec<Cell>>) -> Result<Self> {
        let roles = schema.roles()?;
        if let Some(row) = rows.iter().find(|row| row.len() != schema.len()) {
            return Err(RoomGraphError::schema_mismatch(
                row.len(),
                schema.len(),
                row.iter().map(ToString::to_string).collect::<Vec<_>>().join(","),
            ));
        }
        Ok(Self {
            schema,
            roles,
            rows,
        })
    }

    /// Column layout.
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Resolved role column positions.
    pub const fn roles(&self) -> SchemaRoles {
        self.roles
    }

    /// Rows in file order.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn into_parts(self) -> (Schema, SchemaRoles, Vec<Vec<Cell>>) {
        (self.schema, self.roles, self.rows)
    }
}

/// One cleaned measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// When the count was taken.
    pub timestamp: DateTime<FixedOffset>,
    /// Device count, never negative.
    pub value: f64,
    /// Room or measurement identifier.
    pub room: String,
    /// Remaining columns in schema order.
    pub metadata: Vec<Cell>,
}

/// Cleaned table: every record has a timestamp, a value and a room.
#[derive(Debug, Clone)]
pub struct Dataset {
    schema: Schema,
    records: Vec<Record>,
}

impl Dataset {
    /// Wraps already cleaned records.
    pub const fn new(schema: Schema, records: Vec<Record>) -> Self {
        Self { schema, records }
    }

    /// Column layout the records came from.
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Records in input order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct room identifiers, sorted.
    pub fn rooms(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.room.as_str()).collect()
    }

    /// Keeps only records matching the predicate, preserving order.
    pub fn retain<F>(&mut self, predicate: F)
    where
        F: FnMut(&Record) -> bool,
    {
        self.records.retain(predicate);
    }

    pub(crate) fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }
}

//! Column schema descriptors for the exported device-count tables.
//!
//! Exports carry their own header text but it is not trusted: the loader
//! assigns names from a [`Schema`] positionally. A schema also names the
//! three columns the pipeline relies on (timestamp, value and room).

use crate::error::{Result, RoomGraphError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the loader coerces the cells of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Point in time; unparseable values become missing.
    Timestamp,
    /// Floating point number; unparseable values become missing.
    Numeric,
    /// Free text.
    Text,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timestamp => write!(f, "timestamp"),
            Self::Numeric => write!(f, "numeric"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Canonical column name.
    pub name: String,
    /// Coercion applied on load.
    pub kind: ColumnType,
}

impl Column {
    /// Creates a column descriptor.
    pub fn new(name: impl Into<String>, kind: ColumnType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Built-in column layouts of the known export formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaPreset {
    /// Raw per-device export with ten columns, room in the last one.
    DeviceExport,
    /// Time-series export with nine columns including an explicit room column.
    #[default]
    TimeSeries,
    /// Time-series export with eight columns, room identified by `_measurement`.
    TimeSeriesMeasurement,
}

impl SchemaPreset {
    /// Expands the preset into a full schema.
    pub fn schema(self) -> Schema {
        use ColumnType::{Numeric, Text, Timestamp};

        match self {
            Self::DeviceExport => Schema {
                columns: vec![
                    Column::new("unnamed_1", Text),
                    Column::new("unnamed_2", Text),
                    Column::new("identifier", Text),
                    Column::new("start", Timestamp),
                    Column::new("stop", Timestamp),
                    Column::new("timestamp", Timestamp),
                    Column::new("device_count", Numeric),
                    Column::new("count_label", Text),
                    Column::new("device_type", Text),
                    Column::new("room", Text),
                ],
                timestamp_column: "timestamp".to_string(),
                value_column: "device_count".to_string(),
                room_column: "room".to_string(),
            },
            Self::TimeSeries => Schema {
                columns: time_series_columns(true),
                timestamp_column: "_time".to_string(),
                value_column: "_value".to_string(),
                room_column: "room".to_string(),
            },
            Self::TimeSeriesMeasurement => Schema {
                columns: time_series_columns(false),
                timestamp_column: "_time".to_string(),
                value_column: "_value".to_string(),
                room_column: "_measurement".to_string(),
            },
        }
    }
}

fn time_series_columns(with_room: bool) -> Vec<Column> {
    use ColumnType::{Numeric, Text, Timestamp};

    let mut columns = vec![
        Column::new("result", Text),
        Column::new("table", Numeric),
        Column::new("_start", Timestamp),
        Column::new("_stop", Timestamp),
        Column::new("_time", Timestamp),
        Column::new("_value", Numeric),
        Column::new("_field", Text),
        Column::new("_measurement", Text),
    ];
    if with_room {
        columns.push(Column::new("room", Text));
    }
    columns
}

/// Ordered column layout plus the roles the pipeline needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Columns in file order.
    pub columns: Vec<Column>,
    /// Name of the timestamp column.
    pub timestamp_column: String,
    /// Name of the device-count column.
    pub value_column: String,
    /// Name of the room/measurement identifier column.
    pub room_column: String,
}

/// Resolved positions of the role columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaRoles {
    /// Index of the timestamp column.
    pub timestamp: usize,
    /// Index of the value column.
    pub value: usize,
    /// Index of the room column.
    pub room: usize,
}

impl Schema {
    /// Number of columns the file must have.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the schema declares no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of a column by canonical name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Canonical column names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Resolves the role columns, checking they exist and carry a usable type.
    pub fn roles(&self) -> Result<SchemaRoles> {
        let timestamp = self.role_index(&self.timestamp_column, "timestamp_column")?;
        let value = self.role_index(&self.value_column, "value_column")?;
        let room = self.role_index(&self.room_column, "room_column")?;

        if self.columns[timestamp].kind != ColumnType::Timestamp {
            return Err(RoomGraphError::validation_field(
                format!(
                    "column '{}' must be a timestamp column, found {}",
                    self.timestamp_column, self.columns[timestamp].kind
                ),
                "timestamp_column",
            ));
        }
        if self.columns[value].kind != ColumnType::Numeric {
            return Err(RoomGraphError::validation_field(
                format!(
                    "column '{}' must be numeric, found {}",
                    self.value_column, self.columns[value].kind
                ),
                "value_column",
            ));
        }
        if timestamp == value {
            return Err(RoomGraphError::validation(
                "timestamp and value roles must use different columns",
            ));
        }

        Ok(SchemaRoles {
            timestamp,
            value,
            room,
        })
    }

    /// Validates the schema as a whole.
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(RoomGraphError::validation_field(
                "schema must declare at least one column",
                "columns",
            ));
        }
        for (i, column) in self.columns.iter().enumerate() {
            if column.name.trim().is_empty() {
                return Err(RoomGraphError::validation_field(
                    format!("column {i} has an empty name"),
                    "columns",
                ));
            }
            if self.columns[..i].iter().any(|c| c.name == column.name) {
                return Err(RoomGraphError::validation_field(
                    format!("duplicate column name '{}'", column.name),
                    "columns",
                ));
            }
        }
        self.roles().map(|_| ())
    }

    fn role_index(&self, name: &str, field: &str) -> Result<usize> {
        self.index_of(name).ok_or_else(|| {
            RoomGraphError::validation_field(
                format!("column '{name}' is not part of the schema"),
                field,
            )
        })
    }
}

impl Default for Schema {
    fn default() -> Self {
        SchemaPreset::default().schema()
    }
}

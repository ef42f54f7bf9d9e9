//! Configuration schema definitions using serde.
//!
//! Every section is `#[serde(default)]`, so a file only needs to spell out
//! what differs from the defaults in [`crate::defaults`].

use roomgraph_common::{LoggingConfig, Result, RoomGraphError, Schema, SchemaPreset};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for roomgraph.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input file and its column layout.
    pub source: SourceConfig,
    /// Room identifiers to analyse, in processing order.
    pub rooms: Vec<String>,
    /// Cleaning thresholds.
    pub cleaning: CleaningConfig,
    /// Working-hours window applied to the filtered chart variant.
    pub business_hours: BusinessHoursConfig,
    /// Output directory tree and file names.
    pub output: OutputConfig,
    /// Chart dimensions, labels and styling.
    pub charts: ChartsConfig,
    /// What to report when a room has no records.
    pub missing_room: MissingRoomPolicy,
    /// Logging setup.
    pub logging: LoggingConfig,
}

/// Input file configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Path of the exported CSV file.
    pub path: PathBuf,
    /// Built-in column layout.
    pub layout: SchemaPreset,
    /// Explicit column layout; takes precedence over `layout` when present.
    pub schema: Option<Schema>,
    /// Leading metadata rows to skip before the header.
    pub skip_rows: usize,
    /// Whether the first remaining row is a header (discarded).
    pub has_header: bool,
    /// Field delimiter.
    pub delimiter: char,
    /// Whether columns with no value in any row are removed before the
    /// column count check.
    pub drop_empty_columns: bool,
}

impl SourceConfig {
    /// The effective column layout.
    pub fn schema(&self) -> Schema {
        self.schema
            .clone()
            .unwrap_or_else(|| self.layout.schema())
    }

    /// The delimiter as a byte, as the CSV reader wants it.
    pub fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                RoomGraphError::validation_field(
                    format!("delimiter '{}' is not a single ASCII character", self.delimiter),
                    "source.delimiter",
                )
            })
    }
}

/// Cleaning thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Quantile at or below which values are dropped.
    pub lower_quantile: f64,
    /// Quantile at or above which values are dropped.
    pub upper_quantile: f64,
    /// Whether quantile trimming runs at all.
    pub trim_outliers: bool,
}

/// Working-hours window configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessHoursConfig {
    /// Whether the filtered chart variant is produced.
    pub enabled: bool,
    /// IANA time zone the window is expressed in.
    pub timezone: String,
    /// Start of the working day, `HH:MM`.
    pub open: String,
    /// End of the working day, `HH:MM`.
    pub close: String,
    /// Breaks excluded from the working day.
    pub breaks: Vec<BreakConfig>,
}

/// A break interval in `HH:MM` notation, inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakConfig {
    /// First excluded time of day.
    pub start: String,
    /// Last excluded time of day.
    pub end: String,
}

impl BreakConfig {
    /// Creates a break interval.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// Output tree configuration.
///
/// Directory and file names are templates; `{room}` and `{period}` are
/// replaced per chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root all tiers are created under.
    pub root: PathBuf,
    /// Directory of the whole-range charts.
    pub overall_dir: String,
    /// Directory of the per-month charts.
    pub monthly_dir: String,
    /// Directory of the per-day charts.
    pub daily_dir: String,
    /// Sub-root holding the same tiers for business-hours data.
    pub filtered_dir: String,
    /// File name of a whole-range chart.
    pub overall_file: String,
    /// File name of a per-period chart.
    pub period_file: String,
    /// File name of the multi-room overlay chart, inside `overall_dir`.
    pub overlay_file: String,
}

/// Chart configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartsConfig {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// X axis caption.
    pub x_label: String,
    /// Y axis caption.
    pub y_label: String,
    /// Hex colours used for the series; empty selects a built-in palette.
    pub colors: Vec<String>,
    /// Use the grey built-in palette instead of the coloured one.
    pub monochrome: bool,
    /// Background colour.
    pub background: String,
    /// Whether each sample is drawn as a marker on top of the line.
    pub markers: bool,
    /// Whether grid lines are drawn.
    pub grid: bool,
    /// Whether the multi-room overlay chart is produced.
    pub overlay: bool,
    /// Title templates.
    pub titles: TitlesConfig,
}

/// Chart title templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TitlesConfig {
    /// Whole-range chart of one room.
    pub overall: String,
    /// Per-month chart of one room.
    pub monthly: String,
    /// Per-day chart of one room.
    pub daily: String,
    /// Multi-room overlay chart.
    pub overlay: String,
    /// Suffix appended to titles of business-hours charts.
    pub filtered_suffix: String,
}

/// Reporting of rooms without records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingRoomPolicy {
    /// Log a warning naming the room.
    #[default]
    Warn,
    /// Log at debug level only.
    Ignore,
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        crate::validator::ConfigValidator::validate(self)
    }
}

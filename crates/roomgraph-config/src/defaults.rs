//! Default values matching the room analysis this tool grew out of.

use crate::schema::*;
use roomgraph_common::{LoggingConfig, SchemaPreset};
use std::path::PathBuf;

/// Rooms analysed when none are configured.
pub const DEFAULT_ROOMS: [&str; 3] = ["625", "639", "640"];

/// Breaks excluded from the working day.
pub const DEFAULT_BREAKS: [(&str, &str); 5] = [
    ("09:30", "09:45"),
    ("11:15", "12:15"),
    ("13:45", "14:00"),
    ("15:30", "15:45"),
    ("17:15", "17:30"),
];

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            rooms: DEFAULT_ROOMS.iter().map(ToString::to_string).collect(),
            cleaning: CleaningConfig::default(),
            business_hours: BusinessHoursConfig::default(),
            output: OutputConfig::default(),
            charts: ChartsConfig::default(),
            missing_room: MissingRoomPolicy::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("2024-05-18_Export_01_DRA.csv"),
            layout: SchemaPreset::TimeSeries,
            schema: None,
            skip_rows: 0,
            has_header: true,
            delimiter: ',',
            drop_empty_columns: true,
        }
    }
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            lower_quantile: 0.01,
            upper_quantile: 0.99,
            trim_outliers: true,
        }
    }
}

impl Default for BusinessHoursConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timezone: "Europe/Berlin".to_string(),
            open: "08:00".to_string(),
            close: "18:00".to_string(),
            breaks: DEFAULT_BREAKS
                .iter()
                .map(|(start, end)| BreakConfig::new(*start, *end))
                .collect(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            overall_dir: "gesamt_plots".to_string(),
            monthly_dir: "monatliche_plots_{room}".to_string(),
            daily_dir: "taegliche_plots_{room}".to_string(),
            filtered_dir: "gefiltert".to_string(),
            overall_file: "geraetezaehlung_ueber_zeit_{room}.png".to_string(),
            period_file: "geraetezaehlung_{period}.png".to_string(),
            overlay_file: "geraetezaehlung_alle_raeume.png".to_string(),
        }
    }
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 600,
            x_label: "Zeitstempel".to_string(),
            y_label: "Gerätezählung".to_string(),
            colors: Vec::new(),
            monochrome: false,
            background: "#ffffff".to_string(),
            markers: true,
            grid: true,
            overlay: true,
            titles: TitlesConfig::default(),
        }
    }
}

impl Default for TitlesConfig {
    fn default() -> Self {
        Self {
            overall: "Gerätezählung über die Zeit in {room}".to_string(),
            monthly: "Gerätezählung im {period} in Raum {room}".to_string(),
            daily: "Gerätezählung am {period} in Raum {room}".to_string(),
            overlay: "Gerätezählung über die Zeit, alle Räume".to_string(),
            filtered_suffix: " (Geschäftszeiten)".to_string(),
        }
    }
}

//! Chart types and data structures

use chrono::{DateTime, FixedOffset};
use roomgraph_config::ChartsConfig;
use roomgraph_data::Record;
use serde::{Deserialize, Serialize};

/// Chart configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Caption drawn above the plot.
    pub title: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// X axis caption.
    pub x_label: Option<String>,
    /// Y axis caption.
    pub y_label: Option<String>,
    /// Colours, fonts and decorations.
    pub style: StyleConfig,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: "Chart".to_string(),
            width: 1200,
            height: 600,
            x_label: None,
            y_label: None,
            style: StyleConfig::default(),
        }
    }
}

impl ChartConfig {
    /// Builds a chart configuration from the charts section with the given
    /// title.
    pub fn from_charts(charts: &ChartsConfig, title: impl Into<String>) -> Self {
        let color_scheme = if !charts.colors.is_empty() {
            ColorScheme::Custom(charts.colors.clone())
        } else if charts.monochrome {
            ColorScheme::Monochrome
        } else {
            ColorScheme::Default
        };
        Self {
            title: title.into(),
            width: charts.width,
            height: charts.height,
            x_label: Some(charts.x_label.clone()).filter(|s| !s.is_empty()),
            y_label: Some(charts.y_label.clone()).filter(|s| !s.is_empty()),
            style: StyleConfig {
                color_scheme,
                background_color: Some(charts.background.clone()),
                markers: charts.markers,
                grid: charts.grid,
                ..StyleConfig::default()
            },
        }
    }
}

/// One line of a chart: a named, time-ordered sequence of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    /// Legend label, usually the room identifier.
    pub name: String,
    /// Samples sorted by timestamp.
    pub points: Vec<(DateTime<FixedOffset>, f64)>,
}

impl TimeSeries {
    /// Builds a series from records, sorting by timestamp.
    pub fn from_records(name: impl Into<String>, records: &[&Record]) -> Self {
        let mut points: Vec<_> = records.iter().map(|r| (r.timestamp, r.value)).collect();
        points.sort_by_key(|(ts, _)| *ts);
        Self {
            name: name.into(),
            points,
        }
    }

    /// Whether the series has no samples.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Color scheme for charts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum ColorScheme {
    /// Built-in ten-colour palette.
    #[default]
    Default,
    /// Greys from black to light grey.
    Monochrome,
    /// Hex colours in `#rrggbb` form, cycled per series.
    Custom(Vec<String>),
}

/// Font configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontConfig {
    /// Font family name.
    pub family: String,
    /// Size in points.
    pub size: u32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            size: 14,
        }
    }
}

/// Margin configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarginConfig {
    /// Outer margin in pixels.
    pub outer: u32,
    /// Height of the x label area.
    pub bottom: u32,
    /// Width of the y label area.
    pub left: u32,
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self {
            outer: 20,
            bottom: 60,
            left: 60,
        }
    }
}

/// Comprehensive styling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Series colours.
    pub color_scheme: ColorScheme,
    /// Background colour; white when absent.
    pub background_color: Option<String>,
    /// Caption font.
    pub title_font: FontConfig,
    /// Axis label font.
    pub axis_font: FontConfig,
    /// Plot margins.
    pub margins: MarginConfig,
    /// Whether each sample gets a marker.
    pub markers: bool,
    /// Marker radius in pixels.
    pub marker_size: u32,
    /// Whether grid lines are drawn.
    pub grid: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            color_scheme: ColorScheme::Default,
            background_color: Some("#ffffff".to_string()),
            title_font: FontConfig {
                family: "sans-serif".to_string(),
                size: 22,
            },
            axis_font: FontConfig::default(),
            margins: MarginConfig::default(),
            markers: true,
            marker_size: 3,
            grid: true,
        }
    }
}

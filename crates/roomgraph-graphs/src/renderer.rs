//! Chart rendering trait and the line chart implementation

use crate::{ChartConfig, ColorScheme, TimeSeries};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use plotters::prelude::*;
use roomgraph_common::{format_timestamp, Result};
use std::ops::Range;
use std::path::Path;
use tracing::debug;

/// Palette used when no colours are configured.
const DEFAULT_PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),  // Blue
    RGBColor(255, 127, 14),  // Orange
    RGBColor(44, 160, 44),   // Green
    RGBColor(214, 39, 40),   // Red
    RGBColor(148, 103, 189), // Purple
    RGBColor(140, 86, 75),   // Brown
    RGBColor(227, 119, 194), // Pink
    RGBColor(127, 127, 127), // Gray
    RGBColor(188, 189, 34),  // Olive
    RGBColor(23, 190, 207),  // Cyan
];

/// Seconds of x padding around a chart with a single instant.
const SINGLE_INSTANT_PADDING: f64 = 1800.0;

/// Trait for rendering time-series charts to image files.
///
/// Rendering is CPU-bound and synchronous; callers that want parallelism run
/// it on blocking worker threads.
pub trait ChartRenderer: Send + Sync {
    /// Render the series into one image at `path`, creating parent
    /// directories and overwriting an existing file. An empty `series`
    /// slice yields a chart with axes but no lines.
    fn render_to_file(&self, config: &ChartConfig, series: &[TimeSeries], path: &Path)
        -> Result<()>;

    /// Get colors from color scheme
    fn get_colors(&self, scheme: &ColorScheme) -> Vec<RGBColor> {
        match scheme {
            ColorScheme::Custom(colors) if !colors.is_empty() => {
                colors.iter().map(|c| self.parse_color(c)).collect()
            }
            ColorScheme::Monochrome => vec![
                RGBColor(0, 0, 0),       // Black
                RGBColor(64, 64, 64),    // Dark Gray
                RGBColor(128, 128, 128), // Gray
                RGBColor(176, 176, 176), // Light Gray
            ],
            _ => DEFAULT_PALETTE.to_vec(),
        }
    }

    /// Parse a color string (hex format) to `RGBColor`
    fn parse_color(&self, color_str: &str) -> RGBColor {
        if let Some(hex) = color_str.strip_prefix('#') {
            if hex.len() == 6 && hex.is_ascii() {
                if let (Ok(r), Ok(g), Ok(b)) = (
                    u8::from_str_radix(&hex[0..2], 16),
                    u8::from_str_radix(&hex[2..4], 16),
                    u8::from_str_radix(&hex[4..6], 16),
                ) {
                    return RGBColor(r, g, b);
                }
            }
        }
        // Default to black if parsing fails
        RGBColor(0, 0, 0)
    }

    /// Get background color from style config
    fn get_background_color(&self, config: &ChartConfig) -> RGBColor {
        config
            .style
            .background_color
            .as_ref()
            .map_or(RGBColor(255, 255, 255), |color| self.parse_color(color))
    }
}

/// Axis ranges of a chart. X values are seconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRanges {
    /// Time axis.
    pub x: Range<f64>,
    /// Value axis.
    pub y: Range<f64>,
    /// Offset the time labels are printed in.
    pub offset: FixedOffset,
}

/// Line chart with optional sample markers and a legend for multi-series
/// charts.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineChartRenderer;

impl LineChartRenderer {
    /// Creates a renderer.
    pub const fn new() -> Self {
        Self
    }

    /// Calculate the axis ranges for all series.
    pub fn calculate_ranges(series: &[TimeSeries]) -> ChartRanges {
        let points: Vec<(f64, f64)> = series
            .iter()
            .flat_map(|s| s.points.iter().map(|(ts, v)| (to_x(ts), *v)))
            .collect();
        let offset = series
            .iter()
            .find_map(|s| s.points.first())
            .map_or_else(|| Utc.fix(), |(ts, _)| *ts.offset());

        if points.is_empty() {
            return ChartRanges {
                x: 0.0..3600.0,
                y: 0.0..1.0,
                offset,
            };
        }

        let (x_min, x_max, y_min, y_max) = points.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
            |(x0, x1, y0, y1), (x, y)| (x0.min(*x), x1.max(*x), y0.min(*y), y1.max(*y)),
        );

        let x_padding = if x_max > x_min {
            (x_max - x_min) * 0.02
        } else {
            SINGLE_INSTANT_PADDING
        };
        let y_padding = if y_max > y_min {
            (y_max - y_min) * 0.05
        } else {
            1.0
        };
        let y_low = if y_min >= 0.0 {
            (y_min - y_padding).max(0.0)
        } else {
            y_min - y_padding
        };

        ChartRanges {
            x: (x_min - x_padding)..(x_max + x_padding),
            y: y_low..(y_max + y_padding),
            offset,
        }
    }
}

impl ChartRenderer for LineChartRenderer {
    fn render_to_file(
        &self,
        config: &ChartConfig,
        series: &[TimeSeries],
        path: &Path,
    ) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
        root.fill(&self.get_background_color(config))?;

        let ranges = Self::calculate_ranges(series);
        let span = ranges.x.end - ranges.x.start;
        let offset = ranges.offset;

        let title_font = (
            config.style.title_font.family.as_str(),
            config.style.title_font.size,
        );
        let axis_font = (
            config.style.axis_font.family.as_str(),
            config.style.axis_font.size,
        );
        let mut chart = ChartBuilder::on(&root)
            .caption(&config.title, title_font)
            .margin(config.style.margins.outer)
            .x_label_area_size(config.style.margins.bottom)
            .y_label_area_size(config.style.margins.left)
            .build_cartesian_2d(ranges.x, ranges.y)?;

        let x_formatter = |x: &f64| axis_label(*x, offset, span);
        let mut mesh = chart.configure_mesh();
        mesh.x_labels(8)
            .x_label_formatter(&x_formatter)
            .label_style(axis_font);
        if let Some(x_label) = &config.x_label {
            mesh.x_desc(x_label);
        }
        if let Some(y_label) = &config.y_label {
            mesh.y_desc(y_label);
        }
        if !config.style.grid {
            mesh.disable_mesh();
        }
        mesh.draw()?;

        let colors = self.get_colors(&config.style.color_scheme);
        for (i, line) in series.iter().enumerate() {
            let color = colors[i % colors.len()];
            let points: Vec<(f64, f64)> = line.points.iter().map(|(ts, v)| (to_x(ts), *v)).collect();

            chart
                .draw_series(LineSeries::new(points.iter().copied(), &color))?
                .label(line.name.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));

            if config.style.markers {
                let size = config.style.marker_size;
                chart.draw_series(points.iter().map(|p| Circle::new(*p, size, color.filled())))?;
            }
        }

        if series.len() > 1 {
            chart
                .configure_series_labels()
                .label_font(axis_font)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()?;
        }

        root.present()?;
        debug!(path = %path.display(), series = series.len(), "Rendered line chart");
        Ok(())
    }
}

#[allow(clippy::cast_precision_loss)]
fn to_x(timestamp: &DateTime<FixedOffset>) -> f64 {
    timestamp.timestamp_millis() as f64 / 1000.0
}

/// Formats an axis position; short charts only show the time of day.
#[allow(clippy::cast_possible_truncation)]
fn axis_label(x: f64, offset: FixedOffset, span_seconds: f64) -> String {
    let Some(timestamp) = DateTime::from_timestamp(x.floor() as i64, 0) else {
        return String::new();
    };
    let local = timestamp.with_timezone(&offset);
    if span_seconds <= 36.0 * 3600.0 {
        local.format("%H:%M").to_string()
    } else {
        format_timestamp(&local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomgraph_common::test_utils::mock_timestamp;

    struct MockRenderer;

    impl ChartRenderer for MockRenderer {
        fn render_to_file(
            &self,
            _config: &ChartConfig,
            _series: &[TimeSeries],
            _path: &Path,
        ) -> Result<()> {
            Ok(())
        }
    }

    fn series(name: &str, points: &[(u32, f64)]) -> TimeSeries {
        TimeSeries {
            name: name.to_string(),
            points: points
                .iter()
                .map(|(hour, v)| (mock_timestamp(2024, 5, 17, *hour, 0, 0), *v))
                .collect(),
        }
    }

    #[test]
    fn test_color_schemes() {
        let renderer = MockRenderer;

        let default_colors = renderer.get_colors(&ColorScheme::Default);
        assert_eq!(default_colors.len(), 10);
        assert_eq!(default_colors[0], RGBColor(31, 119, 180));

        let custom = ColorScheme::Custom(vec!["#FF0000".to_string(), "#00ff00".to_string()]);
        let colors = renderer.get_colors(&custom);
        assert_eq!(colors, vec![RGBColor(255, 0, 0), RGBColor(0, 255, 0)]);

        assert_eq!(renderer.get_colors(&ColorScheme::Custom(Vec::new())).len(), 10);
        assert_eq!(renderer.get_colors(&ColorScheme::Monochrome)[0], RGBColor(0, 0, 0));
    }

    #[test]
    fn test_color_parsing() {
        let renderer = MockRenderer;
        assert_eq!(renderer.parse_color("#0000FF"), RGBColor(0, 0, 255));
        assert_eq!(renderer.parse_color("invalid"), RGBColor(0, 0, 0));
        assert_eq!(renderer.parse_color("#ZZ0000"), RGBColor(0, 0, 0));
        assert_eq!(renderer.parse_color("#ä0000"), RGBColor(0, 0, 0));
    }

    #[test]
    fn test_background_color() {
        let renderer = MockRenderer;
        let mut config = ChartConfig::default();
        assert_eq!(renderer.get_background_color(&config), RGBColor(255, 255, 255));

        config.style.background_color = Some("#102030".to_string());
        assert_eq!(renderer.get_background_color(&config), RGBColor(16, 32, 48));
    }

    #[test]
    fn test_empty_ranges_are_fixed() {
        let ranges = LineChartRenderer::calculate_ranges(&[]);
        assert_eq!(ranges.x, 0.0..3600.0);
        assert_eq!(ranges.y, 0.0..1.0);
        assert_eq!(ranges.offset.local_minus_utc(), 0);
    }

    #[test]
    fn test_single_point_is_padded() {
        let ranges = LineChartRenderer::calculate_ranges(&[series("625", &[(8, 4.0)])]);
        assert!((ranges.x.end - ranges.x.start - 2.0 * SINGLE_INSTANT_PADDING).abs() < 1e-6);
        assert!(ranges.y.start < 4.0 && ranges.y.end > 4.0);
    }

    #[test]
    fn test_ranges_cover_all_series() {
        let ranges = LineChartRenderer::calculate_ranges(&[
            series("625", &[(8, 4.0), (9, 6.0)]),
            series("639", &[(7, 1.0), (12, 10.0)]),
        ]);
        let first = to_x(&mock_timestamp(2024, 5, 17, 7, 0, 0));
        let last = to_x(&mock_timestamp(2024, 5, 17, 12, 0, 0));
        assert!(ranges.x.start < first && ranges.x.end > last);
        assert!(ranges.y.start >= 0.0 && ranges.y.start < 1.0);
        assert!(ranges.y.end > 10.0);
    }

    #[test]
    fn test_axis_labels_depend_on_span() {
        let x = to_x(&mock_timestamp(2024, 5, 17, 8, 30, 0));
        let berlin = FixedOffset::east_opt(7200).unwrap();
        assert_eq!(axis_label(x, berlin, 3600.0), "10:30");
        assert_eq!(axis_label(x, berlin, 30.0 * 86400.0), "2024-05-17 10:30");
    }

    #[test]
    fn test_render_to_file_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("chart.png");
        let config = ChartConfig::default();

        LineChartRenderer::new()
            .render_to_file(&config, &[series("625", &[(8, 4.0), (9, 6.0)])], &path)
            .unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 1000, "Generated chart file is too small");
    }

    #[test]
    fn test_render_empty_chart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");

        LineChartRenderer::new()
            .render_to_file(&ChartConfig::default(), &[], &path)
            .unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"), "Empty chart is not a PNG");
    }
}

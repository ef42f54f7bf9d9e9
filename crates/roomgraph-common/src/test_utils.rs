//! Test utilities and shared test helpers for roomgraph.
//!
//! Fixtures for timestamps, CSV exports and configuration files that the
//! unit and integration tests of every crate in the workspace share.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Test fixture for creating a UTC timestamp.
pub fn mock_timestamp(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
) -> DateTime<FixedOffset> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
        .unwrap()
        .fixed_offset()
}

/// Test fixture for creating a timestamp given in local wall-clock time.
pub fn mock_local_timestamp(
    tz: chrono_tz::Tz,
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
) -> DateTime<FixedOffset> {
    tz.with_ymd_and_hms(year, month, day, hour, min, 0)
        .single()
        .expect("unambiguous local time")
        .fixed_offset()
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(any(test, feature = "tempfile"))]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Builders for export files in the supported layouts.
pub mod csv_fixtures {
    /// Header line of a nine-column time-series export.
    pub const TIME_SERIES_HEADER: &str = "result,table,_start,_stop,_time,_value,_field,_measurement,room";

    /// One data line of a nine-column time-series export.
    pub fn time_series_line(time: &str, value: &str, room: &str) -> String {
        format!(
            "_result,0,2024-05-01T00:00:00Z,2024-05-31T00:00:00Z,{time},{value},devices,{room},{room}"
        )
    }

    /// A full export: header followed by one line per `(time, value, room)`.
    pub fn time_series_csv(rows: &[(&str, &str, &str)]) -> String {
        let mut out = String::from(TIME_SERIES_HEADER);
        out.push('\n');
        for (time, value, room) in rows {
            out.push_str(&time_series_line(time, value, room));
            out.push('\n');
        }
        out
    }

    /// Writes `contents` to `dir/name` and returns the path.
    #[cfg(any(test, feature = "tempfile"))]
    pub fn write_csv(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).expect("Failed to write CSV fixture");
        path
    }
}

/// Configuration-related test utilities.
pub mod config_fixtures {
    /// Create a minimal valid test configuration as YAML string.
    pub fn minimal_config_yaml() -> &'static str {
        r#"
source:
  path: "export.csv"

rooms: ["625", "639"]
"#
    }

    /// Create a full test configuration as YAML string.
    pub fn full_config_yaml() -> &'static str {
        concat!(
            "source:\n",
            "  path: \"2024-05-18_Export_01_DRA.csv\"\n",
            "  layout: time_series\n",
            "  skip_rows: 0\n",
            "  has_header: true\n",
            "  delimiter: \",\"\n",
            "  drop_empty_columns: true\n",
            "\n",
            "rooms: [\"625\", \"639\", \"640\"]\n",
            "\n",
            "cleaning:\n",
            "  lower_quantile: 0.01\n",
            "  upper_quantile: 0.99\n",
            "\n",
            "business_hours:\n",
            "  enabled: true\n",
            "  timezone: \"Europe/Berlin\"\n",
            "  open: \"08:00\"\n",
            "  close: \"18:00\"\n",
            "  breaks:\n",
            "    - { start: \"09:30\", end: \"09:45\" }\n",
            "    - { start: \"11:15\", end: \"12:15\" }\n",
            "\n",
            "output:\n",
            "  root: \"plots\"\n",
            "  overall_dir: \"gesamt_plots\"\n",
            "\n",
            "charts:\n",
            "  width: 1000\n",
            "  height: 500\n",
            "  overlay: false\n",
            "\n",
            "missing_room: ignore\n",
            "\n",
            "logging:\n",
            "  level: \"debug\"\n",
            "  format: compact\n"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_init_logging_multiple_calls() {
        init_test_logging();
        init_test_logging();
        init_test_logging();
    }

    #[test]
    fn test_mock_timestamp() {
        let timestamp = mock_timestamp(2024, 5, 17, 12, 0, 0);
        assert_eq!(timestamp.year(), 2024);
        assert_eq!(timestamp.month(), 5);
        assert_eq!(timestamp.day(), 17);
        assert_eq!(timestamp.hour(), 12);
        assert_eq!(timestamp.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_mock_local_timestamp_keeps_wall_clock() {
        let timestamp = mock_local_timestamp(chrono_tz::Europe::Berlin, 2024, 5, 17, 9, 40);
        assert_eq!(timestamp.hour(), 9);
        assert_eq!(timestamp.offset().local_minus_utc(), 2 * 3600);
    }

    #[test]
    fn test_assert_approx_eq() {
        assert_approx_eq(1.0, 1.0001, 0.001);
        assert_approx_eq(1.0, 0.9999, 0.001);
    }

    #[test]
    #[should_panic]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq(1.0, 1.1, 0.05);
    }

    #[test]
    fn test_time_series_csv_fixture() {
        let csv = csv_fixtures::time_series_csv(&[("2024-05-17T08:00:00Z", "4", "625")]);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].split(',').count(), 9);
        assert_eq!(lines[1].split(',').count(), 9);
        assert!(lines[1].ends_with("625,625"));
    }

    #[test]
    fn test_write_csv_fixture() {
        let dir = create_temp_dir();
        let path = csv_fixtures::write_csv(&dir, "export.csv", "a,b\n1,2\n");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "a,b\n1,2\n");
    }
}

//! Integration tests for roomgraph-graphs crate.

use chrono::DateTime;
use roomgraph_config::{ChartsConfig, OutputConfig};
use roomgraph_data::{group_by_period, Period, Record};
use roomgraph_graphs::{
    ChartConfig, ChartRenderer, LineChartRenderer, OutputLayout, TimeSeries, Variant,
};
use std::collections::HashSet;

fn record(ts: &str, value: f64, room: &str) -> Record {
    Record {
        timestamp: DateTime::parse_from_rfc3339(ts).unwrap(),
        value,
        room: room.to_string(),
        metadata: Vec::new(),
    }
}

#[test]
fn test_grouped_series_map_to_unique_paths() {
    let records = [
        record("2024-05-16T08:00:00Z", 3.0, "625"),
        record("2024-05-16T09:00:00Z", 4.0, "625"),
        record("2024-05-17T08:00:00Z", 5.0, "625"),
        record("2024-06-03T08:00:00Z", 6.0, "625"),
    ];
    let refs: Vec<&Record> = records.iter().collect();
    let layout = OutputLayout::new(&OutputConfig::default());

    let mut paths = HashSet::new();
    for period in [Period::Day, Period::Month] {
        for (key, members) in group_by_period(&refs, period) {
            let series = TimeSeries::from_records("625", &members);
            assert!(!series.is_empty());
            for variant in [Variant::All, Variant::BusinessHours] {
                assert!(paths.insert(layout.period_path(variant, "625", period, &key)));
            }
        }
    }
    // Three days and two months, each in both variants.
    assert_eq!(paths.len(), 10);
}

#[test]
fn test_overlay_chart_renders() {
    let dir = tempfile::tempdir().unwrap();
    let mut output = OutputConfig::default();
    output.root = dir.path().to_path_buf();
    let layout = OutputLayout::new(&output);

    let a = [record("2024-05-16T08:00:00Z", 3.0, "625"), record("2024-05-16T09:00:00Z", 5.0, "625")];
    let b = [record("2024-05-16T08:30:00Z", 7.0, "639")];
    let series = vec![
        TimeSeries::from_records("625", &a.iter().collect::<Vec<_>>()),
        TimeSeries::from_records("639", &b.iter().collect::<Vec<_>>()),
    ];
    let config = ChartConfig::from_charts(&ChartsConfig::default(), "Alle Räume");
    let path = layout.overlay_path(Variant::All);

    LineChartRenderer::new()
        .render_to_file(&config, &series, &path)
        .unwrap();
    assert!(path.exists());
}

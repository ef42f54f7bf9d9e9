//! Serialization and property tests for the schema descriptors.

use proptest::prelude::*;
use roomgraph_common::{sanitize_path_component, Column, ColumnType, Schema, SchemaPreset};

#[test]
fn test_custom_schema_from_yaml() {
    let yaml = r#"
columns:
  - { name: when, kind: timestamp }
  - { name: count, kind: numeric }
  - { name: where, kind: text }
timestamp_column: when
value_column: count
room_column: where
"#;
    let schema: Schema = serde_yaml::from_str(yaml).expect("valid schema yaml");

    assert_eq!(schema.len(), 3);
    assert_eq!(schema.columns[0], Column::new("when", ColumnType::Timestamp));
    let roles = schema.roles().expect("roles resolve");
    assert_eq!((roles.timestamp, roles.value, roles.room), (0, 1, 2));
}

#[test]
fn test_preset_round_trips_through_json() {
    let schema = SchemaPreset::DeviceExport.schema();
    let json = serde_json::to_string(&schema).unwrap();
    let back: Schema = serde_json::from_str(&json).unwrap();
    assert_eq!(back, schema);
}

#[test]
fn test_preset_names_are_snake_case() {
    let preset: SchemaPreset = serde_yaml::from_str("time_series_measurement").unwrap();
    assert_eq!(preset, SchemaPreset::TimeSeriesMeasurement);
    assert_eq!(SchemaPreset::default(), SchemaPreset::TimeSeries);
}

#[test]
fn test_names_follow_column_order() {
    let schema = SchemaPreset::TimeSeriesMeasurement.schema();
    let names: Vec<&str> = schema.names().collect();
    assert_eq!(
        names,
        ["result", "table", "_start", "_stop", "_time", "_value", "_field", "_measurement"]
    );
}

proptest! {
    #[test]
    fn test_sanitized_component_never_escapes_directory(input in ".{0,40}") {
        let component = sanitize_path_component(&input);
        prop_assert!(!component.is_empty());
        prop_assert!(!component.contains('/'));
        prop_assert!(!component.contains('\\'));
        prop_assert!(component != "." && component != "..");
    }
}

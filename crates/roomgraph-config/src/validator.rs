//! Runtime validation of a loaded configuration.

use crate::schema::{BusinessHoursConfig, ChartsConfig, CleaningConfig, Config, OutputConfig};
use roomgraph_common::{
    parse_time_of_day, parse_timezone, sanitize_path_component, Result, RoomGraphError,
};
use std::collections::{HashMap, HashSet};
use std::path::{Component, Path};

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration, returning the first problem found.
    pub fn validate(config: &Config) -> Result<()> {
        Self::validate_source(config)?;
        Self::validate_rooms(&config.rooms)?;
        Self::validate_cleaning(&config.cleaning)?;
        Self::validate_business_hours(&config.business_hours)?;
        Self::validate_output(&config.output)?;
        Self::validate_charts(&config.charts)?;
        Ok(())
    }

    fn validate_source(config: &Config) -> Result<()> {
        if config.source.path.as_os_str().is_empty() {
            return Err(RoomGraphError::validation_field(
                "source path cannot be empty",
                "source.path",
            ));
        }
        config.source.delimiter_byte()?;
        config.source.schema().validate()
    }

    fn validate_rooms(rooms: &[String]) -> Result<()> {
        if rooms.is_empty() {
            return Err(RoomGraphError::validation_field(
                "at least one room must be configured",
                "rooms",
            ));
        }
        let mut seen = HashSet::new();
        let mut file_names: HashMap<String, &str> = HashMap::new();
        for room in rooms {
            if room.trim().is_empty() {
                return Err(RoomGraphError::validation_field(
                    "room identifiers cannot be blank",
                    "rooms",
                ));
            }
            if !seen.insert(room.as_str()) {
                return Err(RoomGraphError::validation_field(
                    format!("room '{room}' is listed twice"),
                    "rooms",
                ));
            }
            let file_name = sanitize_path_component(room);
            if let Some(other) = file_names.insert(file_name.clone(), room) {
                return Err(RoomGraphError::validation_field(
                    format!("rooms '{other}' and '{room}' would both write charts named '{file_name}'"),
                    "rooms",
                ));
            }
        }
        Ok(())
    }

    fn validate_cleaning(cleaning: &CleaningConfig) -> Result<()> {
        let in_unit = |q: f64| (0.0..=1.0).contains(&q);
        if !in_unit(cleaning.lower_quantile) || !in_unit(cleaning.upper_quantile) {
            return Err(RoomGraphError::validation_field(
                "quantiles must lie in [0, 1]",
                "cleaning",
            ));
        }
        if cleaning.lower_quantile >= cleaning.upper_quantile {
            return Err(RoomGraphError::validation_field(
                format!(
                    "lower quantile {} must be below upper quantile {}",
                    cleaning.lower_quantile, cleaning.upper_quantile
                ),
                "cleaning",
            ));
        }
        Ok(())
    }

    fn validate_business_hours(hours: &BusinessHoursConfig) -> Result<()> {
        parse_timezone(&hours.timezone)?;

        let open = parse_time_of_day(&hours.open)
            .map_err(|e| RoomGraphError::validation_field(e.to_string(), "business_hours.open"))?;
        let close = parse_time_of_day(&hours.close)
            .map_err(|e| RoomGraphError::validation_field(e.to_string(), "business_hours.close"))?;
        if open >= close {
            return Err(RoomGraphError::validation_field(
                format!("opening time {open} must be before closing time {close}"),
                "business_hours",
            ));
        }

        for (i, interval) in hours.breaks.iter().enumerate() {
            let field = format!("business_hours.breaks[{i}]");
            let start = parse_time_of_day(&interval.start)
                .map_err(|e| RoomGraphError::validation_field(e.to_string(), field.clone()))?;
            let end = parse_time_of_day(&interval.end)
                .map_err(|e| RoomGraphError::validation_field(e.to_string(), field.clone()))?;
            if start > end {
                return Err(RoomGraphError::validation_field(
                    format!("break starts at {start} but ends at {end}"),
                    field,
                ));
            }
        }
        Ok(())
    }

    fn validate_output(output: &OutputConfig) -> Result<()> {
        for (value, field) in [
            (&output.overall_dir, "output.overall_dir"),
            (&output.monthly_dir, "output.monthly_dir"),
            (&output.daily_dir, "output.daily_dir"),
            (&output.filtered_dir, "output.filtered_dir"),
            (&output.overall_file, "output.overall_file"),
            (&output.period_file, "output.period_file"),
            (&output.overlay_file, "output.overlay_file"),
        ] {
            if value.trim().is_empty() {
                return Err(RoomGraphError::validation_field(
                    "output names cannot be empty",
                    field,
                ));
            }
        }

        if Path::new(&output.filtered_dir)
            .components()
            .all(|c| matches!(c, Component::CurDir))
        {
            return Err(RoomGraphError::validation_field(
                format!(
                    "filtered directory '{}' resolves to the output root",
                    output.filtered_dir
                ),
                "output.filtered_dir",
            ));
        }

        // Paths of different rooms and periods must never collide.
        if !output.overall_file.contains("{room}") && !output.overall_dir.contains("{room}") {
            return Err(RoomGraphError::validation_field(
                "overall chart path must contain {room}",
                "output.overall_file",
            ));
        }
        for (dir, field) in [
            (&output.monthly_dir, "output.monthly_dir"),
            (&output.daily_dir, "output.daily_dir"),
        ] {
            if !dir.contains("{room}") && !output.period_file.contains("{room}") {
                return Err(RoomGraphError::validation_field(
                    "per-period chart path must contain {room}",
                    field,
                ));
            }
        }
        if !output.period_file.contains("{period}") {
            return Err(RoomGraphError::validation_field(
                "per-period file name must contain {period}",
                "output.period_file",
            ));
        }
        if output.monthly_dir == output.daily_dir {
            return Err(RoomGraphError::validation_field(
                "monthly and daily charts need distinct directories",
                "output.daily_dir",
            ));
        }
        Ok(())
    }

    fn validate_charts(charts: &ChartsConfig) -> Result<()> {
        if charts.width == 0 || charts.height == 0 {
            return Err(RoomGraphError::validation_field(
                format!("chart size {}x{} must be non-zero", charts.width, charts.height),
                "charts",
            ));
        }
        for color in charts.colors.iter().chain(std::iter::once(&charts.background)) {
            if !is_hex_color(color) {
                return Err(RoomGraphError::validation_field(
                    format!("'{color}' is not a #rrggbb colour"),
                    "charts.colors",
                ));
            }
        }
        Ok(())
    }
}

fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::BreakConfig;

    #[test]
    fn test_rejects_empty_and_duplicate_rooms() {
        let mut config = Config::default();
        config.rooms.clear();
        assert!(ConfigValidator::validate(&config).is_err());

        config.rooms = vec!["625".to_string(), "625".to_string()];
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert!(err.to_string().contains("listed twice"));
    }

    #[test]
    fn test_rejects_rooms_sharing_a_file_name() {
        let mut config = Config::default();
        config.rooms = vec!["A 1".to_string(), "A/1".to_string()];
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert!(matches!(
            err,
            RoomGraphError::Validation { field: Some(ref f), .. } if f == "rooms"
        ));
        assert!(err.to_string().contains("A_1"));

        config.rooms = vec!["A 1".to_string(), "A-1".to_string()];
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_rejects_filtered_dir_at_root() {
        for dir in [".", "./", "./."] {
            let mut config = Config::default();
            config.output.filtered_dir = dir.to_string();
            let err = ConfigValidator::validate(&config).unwrap_err();
            assert!(matches!(
                err,
                RoomGraphError::Validation { field: Some(ref f), .. } if f == "output.filtered_dir"
            ));
        }

        let mut config = Config::default();
        config.output.filtered_dir = "./gefiltert".to_string();
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_rejects_inverted_quantiles() {
        let mut config = Config::default();
        config.cleaning.lower_quantile = 0.99;
        config.cleaning.upper_quantile = 0.01;
        assert!(ConfigValidator::validate(&config).is_err());

        config.cleaning.lower_quantile = -0.1;
        config.cleaning.upper_quantile = 0.5;
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_rejects_bad_business_hours() {
        let mut config = Config::default();
        config.business_hours.open = "18:00".to_string();
        config.business_hours.close = "08:00".to_string();
        assert!(ConfigValidator::validate(&config).is_err());

        let mut config = Config::default();
        config.business_hours.breaks.push(BreakConfig::new("12:00", "11:00"));
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert!(matches!(
            err,
            RoomGraphError::Validation { field: Some(ref f), .. } if f == "business_hours.breaks[5]"
        ));

        let mut config = Config::default();
        config.business_hours.timezone = "Nowhere/Special".to_string();
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_single_instant_break_is_allowed() {
        let mut config = Config::default();
        config.business_hours.breaks = vec![BreakConfig::new("12:00", "12:00")];
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_rejects_colliding_output_templates() {
        let mut config = Config::default();
        config.output.overall_file = "overall.png".to_string();
        assert!(ConfigValidator::validate(&config).is_err());

        let mut config = Config::default();
        config.output.period_file = "chart_{room}.png".to_string();
        assert!(ConfigValidator::validate(&config).is_err());

        let mut config = Config::default();
        config.output.monthly_dir = "plots_{room}".to_string();
        config.output.daily_dir = "plots_{room}".to_string();
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_rejects_bad_colors_and_sizes() {
        let mut config = Config::default();
        config.charts.colors = vec!["#12345".to_string()];
        assert!(ConfigValidator::validate(&config).is_err());

        let mut config = Config::default();
        config.charts.width = 0;
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_rejects_non_ascii_delimiter() {
        let mut config = Config::default();
        config.source.delimiter = '§';
        assert!(ConfigValidator::validate(&config).is_err());

        config.source.delimiter = ';';
        assert!(ConfigValidator::validate(&config).is_ok());
    }
}

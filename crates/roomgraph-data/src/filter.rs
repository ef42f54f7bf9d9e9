//! Business-hours filter.

use crate::dataset::Dataset;
use chrono::{DateTime, Datelike, FixedOffset, NaiveTime, Weekday};
use chrono_tz::Tz;
use roomgraph_common::{parse_time_of_day, parse_timezone, Result};
use roomgraph_config::BusinessHoursConfig;
use tracing::info;

/// A time-of-day interval, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakInterval {
    /// First excluded time.
    pub start: NaiveTime,
    /// Last excluded time.
    pub end: NaiveTime,
}

impl BreakInterval {
    /// Whether `time` lies inside the break.
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time <= self.end
    }
}

/// Keeps weekday records inside the opening window and outside every break,
/// judged in a configured time zone.
#[derive(Debug, Clone)]
pub struct BusinessHours {
    timezone: Tz,
    open: NaiveTime,
    close: NaiveTime,
    breaks: Vec<BreakInterval>,
}

impl BusinessHours {
    /// Creates a filter from explicit parts.
    pub const fn new(timezone: Tz, open: NaiveTime, close: NaiveTime, breaks: Vec<BreakInterval>) -> Self {
        Self {
            timezone,
            open,
            close,
            breaks,
        }
    }

    /// Creates a filter from the business-hours section of the configuration.
    pub fn from_config(config: &BusinessHoursConfig) -> Result<Self> {
        let breaks = config
            .breaks
            .iter()
            .map(|b| {
                Ok(BreakInterval {
                    start: parse_time_of_day(&b.start)?,
                    end: parse_time_of_day(&b.end)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(
            parse_timezone(&config.timezone)?,
            parse_time_of_day(&config.open)?,
            parse_time_of_day(&config.close)?,
            breaks,
        ))
    }

    /// Time zone the window is judged in.
    pub const fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Configured breaks.
    pub fn breaks(&self) -> &[BreakInterval] {
        &self.breaks
    }

    /// Whether the instant falls on a working weekday, inside the opening
    /// window and outside all breaks.
    pub fn contains(&self, timestamp: &DateTime<FixedOffset>) -> bool {
        let local = timestamp.with_timezone(&self.timezone);
        if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
            return false;
        }
        let time = local.time();
        if time < self.open || time > self.close {
            return false;
        }
        !self.breaks.iter().any(|b| b.contains(time))
    }

    /// Converts every timestamp to the configured zone and keeps the records
    /// inside business hours, in their original order.
    pub fn apply(&self, mut dataset: Dataset) -> Dataset {
        let before = dataset.len();
        for record in dataset.records_mut() {
            record.timestamp = record.timestamp.with_timezone(&self.timezone).fixed_offset();
        }
        dataset.retain(|record| self.contains(&record.timestamp));
        info!(
            before,
            after = dataset.len(),
            timezone = %self.timezone,
            "Applied business-hours filter"
        );
        dataset
    }
}

//! Output tree layout.
//!
//! ```text
//! <root>/<overall_dir>/<overall_file>
//! <root>/<monthly_dir>/<period_file>
//! <root>/<daily_dir>/<period_file>
//! <root>/<filtered_dir>/...same three tiers for business-hours data
//! ```

use roomgraph_common::{fill_template, sanitize_path_component};
use roomgraph_config::OutputConfig;
use roomgraph_data::Period;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Which data a chart is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// All cleaned records.
    All,
    /// Records inside business hours only.
    BusinessHours,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::BusinessHours => write!(f, "business_hours"),
        }
    }
}

/// Room token used when the overall directory template names a room but
/// the overlay chart spans all rooms.
const ALL_ROOMS: &str = "all";

/// Maps (variant, room, period) to deterministic file paths.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    config: OutputConfig,
}

impl OutputLayout {
    /// Creates a layout from the output section of the configuration.
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Directory all tiers of a variant live under.
    pub fn variant_root(&self, variant: Variant) -> PathBuf {
        match variant {
            Variant::All => self.config.root.clone(),
            Variant::BusinessHours => self.config.root.join(&self.config.filtered_dir),
        }
    }

    /// Whole-range chart of one room.
    pub fn overall_path(&self, variant: Variant, room: &str) -> PathBuf {
        let room = sanitize_path_component(room);
        self.variant_root(variant)
            .join(fill_template(&self.config.overall_dir, &room, None))
            .join(fill_template(&self.config.overall_file, &room, None))
    }

    /// Chart of one room for one day or month.
    pub fn period_path(&self, variant: Variant, room: &str, period: Period, key: &str) -> PathBuf {
        let room = sanitize_path_component(room);
        let key = sanitize_path_component(key);
        let dir = match period {
            Period::Month => &self.config.monthly_dir,
            Period::Day => &self.config.daily_dir,
        };
        self.variant_root(variant)
            .join(fill_template(dir, &room, Some(&key)))
            .join(fill_template(&self.config.period_file, &room, Some(&key)))
    }

    /// Multi-room overlay chart.
    pub fn overlay_path(&self, variant: Variant) -> PathBuf {
        self.variant_root(variant)
            .join(fill_template(&self.config.overall_dir, ALL_ROOMS, None))
            .join(fill_template(&self.config.overlay_file, ALL_ROOMS, None))
    }
}

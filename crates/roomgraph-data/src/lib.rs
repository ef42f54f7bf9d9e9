//! # Roomgraph Data
//!
//! Loading, cleaning, filtering and grouping of exported room device counts.
//!
//! The stages compose in a fixed order:
//!
//! ```text
//! CsvLoader -> Cleaner -> BusinessHours (optional) -> select_room -> group_by_period
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cell;
pub mod cleaner;
pub mod dataset;
pub mod filter;
pub mod grouper;
pub mod loader;
pub mod selector;
pub mod stats;

pub use cell::{parse_number, parse_timestamp, Cell};
pub use cleaner::Cleaner;
pub use dataset::{Dataset, RawDataset, Record};
pub use filter::{BreakInterval, BusinessHours};
pub use grouper::{group_by_period, Period};
pub use loader::{CsvLoader, LoaderOptions};
pub use selector::{select_room, RoomPartition};
pub use stats::quantile;

//! # Roomgraph Graphs
//!
//! Time-series chart rendering for room device counts.
//!
//! This crate turns grouped records into line charts with plotters and maps
//! every chart to a deterministic path in the output tree.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod output;
pub mod renderer;
pub mod types;

pub use output::*;
pub use renderer::*;
pub use types::*;

//! # roomgraph
//!
//! Turns exported room device-count measurements into cleaned data and a
//! tree of time-series charts: one per room over the whole range, per month
//! and per day, optionally repeated for business hours only.
//!
//! The binary wires the command line and configuration to [`Pipeline`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod error;
pub mod pipeline;

pub use cli::Cli;
pub use error::*;
pub use pipeline::*;

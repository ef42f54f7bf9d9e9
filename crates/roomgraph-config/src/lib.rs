//! # Roomgraph Config
//!
//! Typed configuration for roomgraph.
//!
//! All knobs of the pipeline live in one [`Config`] value that is loaded
//! once, validated, and passed explicitly to every stage.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validator;

pub use defaults::*;
pub use loader::*;
pub use schema::*;
pub use validator::*;

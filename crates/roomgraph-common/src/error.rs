//! Error types and utilities for roomgraph.

use thiserror::Error;

/// Result type alias for roomgraph operations.
pub type Result<T> = std::result::Result<T, RoomGraphError>;

/// Boxed source error carried by the struct-style variants.
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for roomgraph operations.
#[derive(Error, Debug)]
pub enum RoomGraphError {
    /// Configuration related errors.
    #[error("Configuration error: {message}")]
    Config {
        /// Human readable description.
        message: String,
        /// Underlying cause.
        #[source]
        source: Option<BoxedSource>,
    },

    /// I/O related errors (unreadable input, unwritable output).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited-text parsing errors raised by the CSV reader itself.
    #[error("CSV error: {message}")]
    Csv {
        /// Human readable description.
        message: String,
        /// Underlying cause.
        #[source]
        source: Option<BoxedSource>,
    },

    /// The loaded table does not have the column count the schema expects.
    #[error(
        "Schema mismatch: file has {actual} columns after removing empty ones, \
         expected {expected}\n{preview}"
    )]
    SchemaMismatch {
        /// Column count found in the file.
        actual: usize,
        /// Column count declared by the schema.
        expected: usize,
        /// First rows of the file, for diagnosis.
        preview: String,
    },

    /// Chart generation and plotting errors.
    #[error("Graph error: {message}")]
    Graph {
        /// Human readable description.
        message: String,
        /// Underlying cause.
        #[source]
        source: Option<BoxedSource>,
    },

    /// Validation errors for configuration values or schema descriptors.
    #[error("Validation error: {message}")]
    Validation {
        /// Human readable description.
        message: String,
        /// Offending field, when known.
        field: Option<String>,
    },

    /// Generic error with custom message.
    #[error("{message}")]
    Generic {
        /// Human readable description.
        message: String,
        /// Underlying cause.
        #[source]
        source: Option<BoxedSource>,
    },
}

impl RoomGraphError {
    /// Create a new generic error with a custom message.
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new generic error with a custom message and source.
    pub fn with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Generic {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source.
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new schema mismatch error.
    pub fn schema_mismatch(actual: usize, expected: usize, preview: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            actual,
            expected,
            preview: preview.into(),
        }
    }

    /// Create a new graph error.
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new graph error with source.
    pub fn graph_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Graph {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a new validation error with field name.
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Whether the pipeline must abort before any further processing.
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::SchemaMismatch { .. } | Self::Io(_) | Self::Csv { .. } | Self::Config { .. }
        )
    }
}

// Error conversion implementations for external types

/// Convert from `csv::Error` to `RoomGraphError`.
impl From<csv::Error> for RoomGraphError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            let message = err.to_string();
            match err.into_kind() {
                csv::ErrorKind::Io(io) => Self::Io(io),
                _ => Self::new(message),
            }
        } else {
            let message = match err.position() {
                Some(pos) => format!("malformed record near line {}", pos.line()),
                None => "malformed record".to_string(),
            };
            Self::Csv {
                message,
                source: Some(Box::new(err)),
            }
        }
    }
}

/// Convert from `serde_yaml::Error` to `RoomGraphError`.
impl From<serde_yaml::Error> for RoomGraphError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::config_with_source("YAML parsing error", err)
    }
}

/// Convert from `toml::de::Error` to `RoomGraphError`.
impl From<toml::de::Error> for RoomGraphError {
    fn from(err: toml::de::Error) -> Self {
        Self::config_with_source("TOML parsing error", err)
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to `RoomGraphError`.
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for RoomGraphError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::graph_with_source("Chart rendering failed", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{error::Error, io};

    #[test]
    fn test_error_creation() {
        let error = RoomGraphError::new("test message");
        assert!(error.to_string().contains("test message"));

        let config_error = RoomGraphError::config("config issue");
        assert!(config_error.to_string().contains("Configuration error"));
        assert!(config_error.to_string().contains("config issue"));

        let validation_error = RoomGraphError::validation_field("Invalid time", "business_hours.open");
        assert!(validation_error.to_string().contains("Validation error"));
        assert!(validation_error.to_string().contains("Invalid time"));

        let graph_error = RoomGraphError::graph("no backend");
        assert_eq!(graph_error.to_string(), "Graph error: no backend");
    }

    #[test]
    fn test_schema_mismatch_reports_counts_and_preview() {
        let error = RoomGraphError::schema_mismatch(6, 9, "a,b,c,d,e,f");
        let text = error.to_string();

        assert!(text.contains('6'));
        assert!(text.contains('9'));
        assert!(text.contains("a,b,c,d,e,f"));
        assert!(error.is_fatal());
    }

    #[test]
    fn test_error_with_source() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let wrapped_error = RoomGraphError::with_source("Failed to read file", io_error);

        assert!(wrapped_error.to_string().contains("Failed to read file"));
        assert!(wrapped_error.source().is_some());
        assert!(!wrapped_error.is_fatal());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "Access denied");
        let error: RoomGraphError = io_error.into();

        assert!(error.to_string().contains("I/O error"));
        assert!(error.source().is_some());
        assert!(error.is_fatal());
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<Vec<u32>>("{ not: [a list").unwrap_err();
        let error: RoomGraphError = yaml_error.into();

        assert!(error.to_string().contains("Configuration error"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_error_chain_preservation() {
        let root_error = io::Error::new(io::ErrorKind::NotFound, "Root cause");
        let middle_error = RoomGraphError::config_with_source("Middle layer", root_error);
        let top_error = RoomGraphError::with_source("Top layer", middle_error);

        let mut current_error: &dyn std::error::Error = &top_error;
        let mut error_count = 0;
        while let Some(source) = current_error.source() {
            current_error = source;
            error_count += 1;
        }

        assert_eq!(error_count, 2);
    }
}

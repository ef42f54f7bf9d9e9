//! Structured logging infrastructure for roomgraph.

use crate::error::{Result, RoomGraphError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format of the log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Multi-line, human oriented output with colours.
    #[default]
    Pretty,
    /// Single-line output.
    Compact,
    /// Newline-delimited JSON.
    Json,
}

/// Configuration for the logging system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "`roomgraph_data=trace`").
    pub level: String,
    /// Line format.
    pub format: LogFormat,
    /// Optional file path for log output instead of stderr.
    pub file_path: Option<PathBuf>,
    /// Whether to include target module information.
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            file_path: None,
            include_targets: true,
        }
    }
}

impl LoggingConfig {
    /// Builds the level filter. `RUST_LOG` wins over the configured level.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Initialize the tracing subscriber with the given configuration.
///
/// When a log file is configured the returned guard must be kept alive until
/// the process exits, otherwise buffered lines are lost.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let registry = tracing_subscriber::registry().with(config.env_filter());

    let (writer, guard) = match &config.file_path {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    let ansi = writer.is_none();
    let result = match (config.format, writer) {
        (LogFormat::Json, Some(w)) => registry
            .with(fmt::layer().json().with_target(config.include_targets).with_writer(w))
            .try_init(),
        (LogFormat::Json, None) => registry
            .with(fmt::layer().json().with_target(config.include_targets).with_writer(std::io::stderr))
            .try_init(),
        (LogFormat::Compact, Some(w)) => registry
            .with(fmt::layer().compact().with_ansi(false).with_target(config.include_targets).with_writer(w))
            .try_init(),
        (LogFormat::Compact, None) => registry
            .with(fmt::layer().compact().with_ansi(ansi).with_target(config.include_targets).with_writer(std::io::stderr))
            .try_init(),
        (LogFormat::Pretty, Some(w)) => registry
            .with(fmt::layer().pretty().with_ansi(false).with_target(config.include_targets).with_writer(w))
            .try_init(),
        (LogFormat::Pretty, None) => registry
            .with(fmt::layer().pretty().with_ansi(ansi).with_target(config.include_targets).with_writer(std::io::stderr))
            .try_init(),
    };

    result.map_err(|e| RoomGraphError::config(format!("logging already initialised: {e}")))?;
    Ok(guard)
}

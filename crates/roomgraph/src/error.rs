//! Application-wide error types using thiserror.

use roomgraph_common::RoomGraphError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Loading, cleaning, configuration or rendering failed.
    #[error(transparent)]
    Pipeline(#[from] RoomGraphError),

    /// A rendering worker panicked or was cancelled.
    #[error("Rendering task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl AppError {
    /// The error followed by its chain of causes, one per line.
    pub fn chain(&self) -> String {
        let mut lines = vec![self.to_string()];
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            let line = format!("caused by: {cause}");
            if !lines.iter().any(|l| l.ends_with(&cause.to_string())) {
                lines.push(line);
            }
            source = cause.source();
        }
        lines.join("\n")
    }
}

/// Result type for the application.
pub type AppResult<T> = Result<T, AppError>;

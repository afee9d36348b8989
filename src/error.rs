//! Error types for the gantt editor.

use crate::store::StoreError;

/// Top-level error type for the chart service.
#[derive(Debug, thiserror::Error)]
pub enum GanttError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Persistence store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// HTTP server error (bind, serve).
    #[error("server error: {0}")]
    Server(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, GanttError>;

//! Error types for muletrace.
//!
//! The analysis core is a pure function over well-formed input and never
//! fails; errors arise at the edges (ingest, configuration).

use thiserror::Error;

/// Result type alias using `ForensicsError`.
pub type Result<T> = std::result::Result<T, ForensicsError>;

/// Errors that can occur around an analysis run.
#[derive(Debug, Error)]
pub enum ForensicsError {
    /// Input rows could not be parsed into transactions.
    #[error("Ingest error: {0}")]
    Ingest(String),

    /// Required input columns are absent.
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// Configuration is not usable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ForensicsError {
    /// Create an ingest error.
    #[must_use]
    pub fn ingest(msg: impl Into<String>) -> Self {
        ForensicsError::Ingest(msg.into())
    }

    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        ForensicsError::Config(msg.into())
    }
}

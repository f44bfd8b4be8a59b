//! Error types for devreach.
//!
//! Library crates use [`ReachError`] via `thiserror`.
//! The CLI app crate wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all devreach operations.
#[derive(Debug, thiserror::Error)]
pub enum ReachError {
    /// Configuration loading or validation error (including missing secrets).
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error talking to an external service.
    #[error("network error: {0}")]
    Network(String),

    /// Dependent-resolution error (subprocess, snapshot file, or output parsing).
    #[error("resolver error: {0}")]
    Resolver(String),

    /// Text-generation service error.
    #[error("generation error: {0}")]
    Generation(String),

    /// Memory-store service error.
    #[error("memory error: {0}")]
    Memory(String),

    /// Run-record (CSV) write error.
    #[error("record error: {0}")]
    Record(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (malformed identifier, invalid format, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ReachError>;

impl ReachError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

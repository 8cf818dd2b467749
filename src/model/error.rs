//! Error types for threadlens.
//!
//! Errors are `thiserror` enums per concern, composed into [`AppError`] via `From`
//! so the shell can propagate everything with `?`.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error returned by the shell
//!   - [`InputError`] - Transcript file reading failures
//!   - [`ConfigError`](crate::config::ConfigError) - Config file read/parse failures
//!   - [`LoggingError`](crate::logging::LoggingError) - Tracing initialisation failures
//!   - [`ExportError`](crate::export::ExportError) - Stage export failures
//!   - `std::io::Error` - Terminal failures
//!
//! The navigation core (`view_state`, `state`) has no error paths. Malformed
//! transcript lines are skipped and logged, never surfaced as errors.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to read the transcript.
    #[error("Failed to read input: {0}")]
    InputRead(#[from] InputError),

    /// Config file exists but is unusable.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Tracing could not be initialised.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// Writing exported stages failed.
    #[error("Export error: {0}")]
    Export(#[from] crate::export::ExportError),

    /// Terminal or TUI rendering error.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Errors encountered when reading a transcript file.
#[derive(Debug, Error)]
pub enum InputError {
    /// The transcript path does not exist.
    #[error("Transcript not found: {}", path.display())]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
    },

    /// Any other I/O failure while reading.
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

//! # Design
//!
//! - Structured, constant-message errors for logger construction and setup.
//! - Capture the offending path and the source error so startup failures on
//!   scheduled runs are diagnosable from the exit message alone.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Errors produced while setting up logging.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The global tracing subscriber could not be installed.
    #[error("failed to install tracing subscriber")]
    Subscriber {
        /// Description from the subscriber registry.
        detail: String,
    },
    /// The log directory was not provided while file logging was requested.
    #[error("log directory is empty")]
    EmptyLogDir,
    /// The log directory could not be created.
    #[error("failed to create log directory")]
    CreateLogDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The level configuration file could not be read.
    #[error("failed to read level configuration")]
    LevelsRead {
        /// Path of the level configuration file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The level configuration file could not be parsed.
    #[error("failed to parse level configuration")]
    LevelsParse {
        /// Path of the level configuration file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

//! # Design
//!
//! - Structured, constant-message errors for configuration loading.
//! - Configuration failures are fatal and happen before any filesystem
//!   mutation, so the fields carry everything an operator needs to fix the
//!   file.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors produced while reading or writing operator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file")]
    Read {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// A section header had no name.
    #[error("empty section name in configuration file")]
    EmptySectionName {
        /// Path of the configuration file.
        path: PathBuf,
    },
    /// A non-comment line appeared before any section header.
    #[error("configuration line outside of any section")]
    LineOutsideSection {
        /// Path of the configuration file.
        path: PathBuf,
        /// The offending line.
        line: String,
    },
    /// The `[backup]` section was missing.
    #[error("missing [backup] section")]
    MissingBackupSection {
        /// Path of the configuration file.
        path: PathBuf,
    },
    /// The `path` key in `[backup]` was missing or empty.
    #[error("missing 'path' key in [backup] section")]
    MissingBackupPath {
        /// Path of the configuration file.
        path: PathBuf,
    },
    /// No usable entries were found in the `[paths]` section.
    #[error("no paths configured")]
    NoPaths {
        /// Path of the configuration file.
        path: PathBuf,
    },
    /// A sample configuration would overwrite an existing file.
    #[error("configuration file already exists")]
    SampleExists {
        /// Path of the existing configuration file.
        path: PathBuf,
    },
    /// The sample configuration could not be written.
    #[error("failed to write sample configuration")]
    Write {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
}

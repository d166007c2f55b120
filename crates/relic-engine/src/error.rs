//! # Design
//!
//! - Structured, constant-message errors for the maintenance engine.
//! - Only run-fatal conditions become error values that propagate; per-item
//!   failures are logged by the processor and folded into counters instead.
//! - Context fields (operation, paths, attempt counts) make failures
//!   reproducible in tests without parsing messages.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors produced by the maintenance engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The backup destination failed the safety gate.
    #[error("backup destination rejected")]
    Gate {
        /// Destination that failed validation.
        path: PathBuf,
        /// Static reason for the rejection.
        reason: &'static str,
        /// Underlying IO error when one exists.
        source: Option<io::Error>,
    },
    /// A configured root could not be walked at all.
    #[error("root walk failed")]
    Walk {
        /// Root whose walk failed.
        path: PathBuf,
        /// Underlying traversal error.
        source: walkdir::Error,
    },
    /// A discovered file resolved outside its owning root.
    #[error("source path escapes its root")]
    PathEscapesRoot {
        /// Path that escaped.
        path: PathBuf,
        /// Root it was expected to stay under.
        root: PathBuf,
    },
    /// A copy failed after exhausting every retry attempt.
    #[error("copy failed after retries")]
    Copy {
        /// Source of the failed copy.
        src: PathBuf,
        /// Destination of the failed copy.
        dst: PathBuf,
        /// Total attempts made.
        attempts: u32,
        /// Error from the final attempt.
        source: io::Error,
    },
    /// The run was cancelled while an operation was waiting.
    #[error("run cancelled")]
    Cancelled,
    /// IO failure in a run-fatal context (for example log pruning).
    #[error("engine io failure")]
    Io {
        /// Operation that triggered the failure.
        operation: &'static str,
        /// Path involved in the failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// A path expected to be a directory was something else.
    #[error("not a directory")]
    NotADirectory {
        /// The offending path.
        path: PathBuf,
    },
}

impl EngineError {
    pub(crate) fn gate(
        path: impl Into<PathBuf>,
        reason: &'static str,
        source: Option<io::Error>,
    ) -> Self {
        Self::Gate {
            path: path.into(),
            reason,
            source,
        }
    }

    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

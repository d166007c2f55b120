//! # Design
//!
//! - Centralize application-level errors for bootstrap and the run.
//! - Keep error messages constant while carrying the operation identifier
//!   and the source error for debugging.

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Logging setup failed.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: relic_telemetry::TelemetryError,
    },
    /// Configuration operations failed.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: relic_config::ConfigError,
    },
    /// The maintenance engine failed.
    #[error("maintenance operation failed")]
    Engine {
        /// Operation identifier.
        operation: &'static str,
        /// Source engine error.
        source: relic_engine::EngineError,
    },
}

impl AppError {
    pub(crate) const fn telemetry(
        operation: &'static str,
        source: relic_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }

    pub(crate) const fn config(operation: &'static str, source: relic_config::ConfigError) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn engine(operation: &'static str, source: relic_engine::EngineError) -> Self {
        Self::Engine { operation, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::path::PathBuf;

    #[test]
    fn helpers_build_variants() {
        let telemetry = AppError::telemetry("init", relic_telemetry::TelemetryError::EmptyLogDir);
        assert!(matches!(telemetry, AppError::Telemetry { .. }));
        assert!(telemetry.source().is_some());

        let config = AppError::config(
            "load",
            relic_config::ConfigError::MissingBackupSection {
                path: PathBuf::from("config.ini"),
            },
        );
        assert!(matches!(config, AppError::Config { .. }));

        let engine = AppError::engine(
            "gate",
            relic_engine::EngineError::NotADirectory {
                path: PathBuf::from("/bk"),
            },
        );
        assert!(matches!(engine, AppError::Engine { .. }));
    }
}

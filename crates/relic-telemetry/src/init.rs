//! Console tracing subscriber for developer-facing diagnostics.
//!
//! # Design
//! - One entry point that installs an `EnvFilter`-driven fmt subscriber.
//! - The run logger (`logger.rs`) stays independent: operational log lines
//!   for scheduled runs go to daily files, while tracing covers interactive
//!   bootstrap output.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{TelemetryError, TelemetryResult};

/// Default logging target when `RUST_LOG` is not provided.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Configure and install the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the tracing subscriber cannot be installed (for
/// example, because another subscriber has already been set globally).
pub fn init_console(level: &str) -> TelemetryResult<()> {
    tracing_subscriber::registry()
        .with(build_env_filter(level))
        .with(fmt::layer().with_target(false).with_thread_ids(false))
        .try_init()
        .map_err(|err| TelemetryError::Subscriber {
            detail: err.to_string(),
        })
}

fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! Logging for scheduled maintenance runs.
//!
//! Layout: `init.rs` (console tracing subscriber), `logger.rs` (the shared
//! run logger with per-level daily files), `error.rs` (structured errors).

mod error;
mod init;
mod logger;

pub use error::{TelemetryError, TelemetryResult};
pub use init::{DEFAULT_LOG_LEVEL, init_console};
pub use logger::{Level, LogSettings, Logger};

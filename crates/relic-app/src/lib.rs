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

//! Application wiring for the maintenance service.
//!
//! Layout: `cli.rs` (flags), `bootstrap.rs` (boot sequence), `error.rs`
//! (application errors).

/// Application boot sequence.
pub mod bootstrap;
/// Command-line flags.
pub mod cli;
/// Application-level errors.
pub mod error;

pub use bootstrap::{run_app, run_with};
pub use cli::Cli;
pub use error::{AppError, AppResult};

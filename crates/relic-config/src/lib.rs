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

//! Operator configuration for maintenance runs.
//!
//! Layout: `model.rs` (typed configuration), `loader.rs` (the `config.ini`
//! reader and sample writer), `error.rs` (structured errors).

mod error;
mod loader;
mod model;

pub use error::{ConfigError, ConfigResult};
pub use loader::{CONFIG_FILE, load_config, write_sample_config};
pub use model::{MaintenanceConfig, RootEntry};

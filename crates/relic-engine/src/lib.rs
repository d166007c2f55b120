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

//! Scheduled maintenance engine for aged files.
//!
//! Discovery runs as a pool of bounded concurrent walkers feeding a bounded
//! job queue; a single processor performs the file operations (optional
//! backup, then delete, then empty-directory reclamation) one at a time so
//! copy/delete load on network shares stays predictable.
//!
//! Layout: `planner.rs` (root classification), `gate.rs` (backup destination
//! probe), `worker.rs` (walker pool, processor, run controller), `backup.rs`
//! (destination paths and copy-with-retry), `reclaim.rs` (delete and upward
//! directory cleanup), `retention.rs` (age cutoff helpers), `pruner.rs`
//! (log housekeeping).

mod backup;
mod cancel;
mod error;
mod gate;
mod model;
mod planner;
mod pruner;
mod reclaim;
mod retention;
mod worker;

pub use error::{EngineError, EngineResult};
pub use gate::verify_backup_root;
pub use model::{FileJob, RootKind, RootSpec, RunOptions, RunReport};
pub use planner::plan_roots;
pub use pruner::prune_old_logs;
pub use worker::MaintenanceEngine;

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

//! Binary entrypoint for scheduled maintenance runs.

use relic_app::{AppResult, run_app};

/// Runs one maintenance pass and exits; scheduling belongs to the OS.
#[tokio::main]
async fn main() -> AppResult<()> {
    run_app().await
}

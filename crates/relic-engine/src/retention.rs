//! Age-cutoff helpers shared by the walkers and the log pruner.

use std::path::Path;
use std::time::{Duration, SystemTime};

const SECONDS_PER_DAY: u64 = 86_400;

/// Compute the eligibility cutoff for the given retention window, captured
/// once at run start.
///
/// `days == 0` yields a cutoff of "now": every file that already exists is
/// older than it, except files with future timestamps.
pub(crate) fn cutoff_from_days(days: u32) -> SystemTime {
    SystemTime::now() - Duration::from_secs(u64::from(days) * SECONDS_PER_DAY)
}

/// Whether a modification time falls strictly before the cutoff.
///
/// The comparison is strict: a file whose mtime equals the cutoff is not
/// eligible.
pub(crate) fn is_older_than(modified: SystemTime, cutoff: SystemTime) -> bool {
    modified < cutoff
}

/// Conservative existence probe.
///
/// Stat errors other than "not found" (permissions, transient share issues)
/// are treated as "exists" so the caller never clobbers a path it cannot
/// inspect.
pub(crate) fn path_exists(path: &Path) -> bool {
    match std::fs::symlink_metadata(path) {
        Ok(_) => true,
        Err(err) => err.kind() != std::io::ErrorKind::NotFound,
    }
}

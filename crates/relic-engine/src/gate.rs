//! Safety gate for the backup destination.

use std::path::Path;

use crate::error::{EngineError, EngineResult};

/// Validate that the backup destination is safe to use.
///
/// Intentionally conservative: a gate failure aborts the run before any
/// deletion happens. The destination must exist, be a directory, and accept
/// creation and removal of a uniquely named probe file. The probe is a real
/// write test, which matters for network shares that are reachable but
/// read-only or running on expired credentials.
///
/// The check is best-effort at the time it runs: later per-file copies can
/// still fail and are handled by the copy retries.
///
/// # Errors
///
/// Returns a `Gate` error describing which validation step failed.
pub fn verify_backup_root(backup_root: &Path) -> EngineResult<()> {
    let metadata = std::fs::metadata(backup_root)
        .map_err(|source| EngineError::gate(backup_root, "destination not accessible", Some(source)))?;

    if !metadata.is_dir() {
        return Err(EngineError::gate(
            backup_root,
            "destination is not a directory",
            None,
        ));
    }

    let probe = tempfile::Builder::new()
        .prefix(".backup_probe_")
        .tempfile_in(backup_root)
        .map_err(|source| EngineError::gate(backup_root, "destination not writable", Some(source)))?;

    probe
        .close()
        .map_err(|source| EngineError::gate(backup_root, "probe file cleanup failed", Some(source)))
}

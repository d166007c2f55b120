//! Source deletion and bottom-up reclamation of emptied directories.

use std::path::Path;

use relic_telemetry::Logger;

/// Remove a single file from disk. Hard delete; no recycle-bin semantics.
///
/// Callers must have completed any required backup first.
pub(crate) fn delete_file(path: &Path) -> std::io::Result<()> {
    std::fs::remove_file(path)
}

/// Remove empty directories starting at `start` and walking upward, never
/// past `stop`.
///
/// Stops quietly as soon as a directory is non-empty, cannot be read or
/// removed, or equals the owning root. The root boundary is strict: `stop`
/// itself is never removed, nor is anything above it. Failures end the walk
/// instead of propagating, so reclamation can never fail a run.
pub(crate) fn reclaim_empty_dirs(start: &Path, stop: &Path, logger: &Logger) {
    let mut current = start.to_path_buf();

    loop {
        if same_path(&current, stop) {
            return;
        }

        match is_dir_empty(&current) {
            Ok(true) => {}
            Ok(false) | Err(_) => return,
        }

        if std::fs::remove_dir(&current).is_err() {
            return;
        }
        logger.info(&format!("Removed empty directory: {}", current.display()));

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => return,
        }
    }
}

/// Compare two paths for equality after resolving both to absolute form.
///
/// The comparison folds ASCII case because the primary deployment target is
/// a case-insensitive filesystem; on case-sensitive filesystems this only
/// makes the boundary check more conservative. Resolution failure counts as
/// "not equal" so callers stop rather than guess.
pub(crate) fn same_path(a: &Path, b: &Path) -> bool {
    let Ok(abs_a) = std::path::absolute(a) else {
        return false;
    };
    let Ok(abs_b) = std::path::absolute(b) else {
        return false;
    };
    abs_a
        .as_os_str()
        .to_string_lossy()
        .eq_ignore_ascii_case(&abs_b.as_os_str().to_string_lossy())
}

/// Whether a directory has zero entries. Non-recursive; errors propagate so
/// the caller can stop conservatively.
fn is_dir_empty(path: &Path) -> std::io::Result<bool> {
    Ok(std::fs::read_dir(path)?.next().is_none())
}

//! Housekeeping for the log directory after a run completes.

use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::retention;

/// Delete log files older than the retention window.
///
/// Non-recursive and best-effort per file: locked or vanished files are
/// skipped silently and subdirectories are never touched. A missing log
/// directory is created and counts as success, since there is nothing to
/// prune on a first run.
///
/// # Errors
///
/// Returns an error only for environment problems: the path exists but is
/// not a directory, it cannot be created, or its entries cannot be listed.
pub fn prune_old_logs(log_dir: &Path, retention_days: u32) -> EngineResult<()> {
    let metadata = match std::fs::metadata(log_dir) {
        Ok(metadata) => metadata,
        Err(_) => {
            return std::fs::create_dir_all(log_dir)
                .map_err(|source| EngineError::io("create log directory", log_dir, source));
        }
    };

    if !metadata.is_dir() {
        return Err(EngineError::NotADirectory {
            path: log_dir.to_path_buf(),
        });
    }

    let cutoff = retention::cutoff_from_days(retention_days);
    let entries = std::fs::read_dir(log_dir)
        .map_err(|source| EngineError::io("read log directory", log_dir, source))?;

    for entry in entries {
        let Ok(entry) = entry else { continue };
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            continue;
        }
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        let Ok(modified) = metadata.modified() else {
            continue;
        };
        if retention::is_older_than(modified, cutoff) {
            let _ = std::fs::remove_file(entry.path());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::FileTime;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn backdate(path: &Path, days: u64) {
        let past = SystemTime::now() - Duration::from_secs(days * 86_400);
        filetime::set_file_mtime(path, FileTime::from_system_time(past)).expect("set mtime");
    }

    #[test]
    fn removes_only_aged_files() {
        let dir = TempDir::new().expect("tempdir");
        let old = dir.path().join("maintenance_2026-01-01.log");
        let fresh = dir.path().join("maintenance_today.log");
        std::fs::write(&old, b"old").expect("write old");
        std::fs::write(&fresh, b"fresh").expect("write fresh");
        backdate(&old, 40);

        prune_old_logs(dir.path(), 30).expect("prune should succeed");

        assert!(!old.exists());
        assert!(fresh.exists());
    }

    #[test]
    fn skips_subdirectories() {
        let dir = TempDir::new().expect("tempdir");
        let sub = dir.path().join("archive");
        std::fs::create_dir(&sub).expect("create subdir");
        backdate(&sub, 90);

        prune_old_logs(dir.path(), 30).expect("prune should succeed");

        assert!(sub.exists());
    }

    #[test]
    fn missing_directory_is_created() {
        let dir = TempDir::new().expect("tempdir");
        let logs = dir.path().join("logs");

        prune_old_logs(&logs, 30).expect("prune should succeed");

        assert!(logs.is_dir());
    }

    #[test]
    fn non_directory_path_is_an_error() {
        let dir = TempDir::new().expect("tempdir");
        let file = dir.path().join("logs");
        std::fs::write(&file, b"x").expect("write file");

        let err = prune_old_logs(&file, 30).expect_err("must fail");
        assert!(matches!(err, EngineError::NotADirectory { .. }));
    }
}

//! Backup destination paths and the streaming copy with retry.

use std::fs::File;
use std::io::{Read as _, Write as _};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use relic_telemetry::Logger;

use crate::cancel::CancelSignal;
use crate::error::{EngineError, EngineResult};

/// Streaming copy buffer. Balances memory use and throughput on network
/// shares.
const COPY_BUFFER_LEN: usize = 256 * 1024;

/// Date folder shared by every backup in a run, e.g. `30Jan26`.
///
/// Captured once at run start; English month abbreviations regardless of
/// locale.
pub(crate) fn run_date_label() -> String {
    Local::now().format("%d%b%y").to_string()
}

/// Build the destination for a backup, preserving the structure relative to
/// the owning root:
///
/// `backup_root/<label>/<path relative to root>`
///
/// The relative path is normalized before joining, so intra-root traversal
/// segments collapse safely. Does not touch the filesystem.
///
/// # Errors
///
/// Returns `PathEscapesRoot` when the source does not resolve under its
/// root.
pub(crate) fn backup_dest_path(
    backup_root: &Path,
    label: &str,
    root: &Path,
    src: &Path,
) -> EngineResult<PathBuf> {
    let rel = relative_to(root, src)?;
    Ok(backup_root.join(label).join(rel))
}

/// Normalized path of `src` relative to `root`.
fn relative_to(root: &Path, src: &Path) -> EngineResult<PathBuf> {
    let root_normalized = normalize(root);
    let src_normalized = normalize(src);
    src_normalized
        .strip_prefix(&root_normalized)
        .map(Path::to_path_buf)
        .map_err(|_| EngineError::PathEscapesRoot {
            path: src.to_path_buf(),
            root: root.to_path_buf(),
        })
}

/// Lexical normalization: drops `.` segments and collapses `..` against the
/// preceding component. Absolute paths never pop past their root.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => out.push(prefix.as_os_str()),
            Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                let keeps_parent =
                    matches!(out.components().next_back(), Some(Component::ParentDir));
                if keeps_parent || (!out.pop() && !out.has_root()) {
                    out.push("..");
                }
            }
            Component::Normal(segment) => out.push(segment),
        }
    }
    out
}

/// Copy `src` to `dst`, retrying transient failures with a small capped
/// backoff (250 ms, 1 s, then 3 s).
///
/// The caller must have established that `dst` does not already exist; this
/// function has no overwrite semantics of its own. The backoff sleep races
/// the cancel signal so a stopping run never stalls in a retry window.
///
/// # Errors
///
/// Returns `Cancelled` when the run is cancelled mid-retry, or `Copy` once
/// every attempt has failed.
pub(crate) async fn copy_with_retry(
    src: &Path,
    dst: &Path,
    retries: u32,
    cancel: &CancelSignal,
    logger: &Logger,
) -> EngineResult<()> {
    let mut attempt = 0;
    loop {
        if cancel.is_fired() {
            return Err(EngineError::Cancelled);
        }

        let Err(err) = copy_stream(src, dst) else {
            return Ok(());
        };

        if attempt >= retries {
            return Err(EngineError::Copy {
                src: src.to_path_buf(),
                dst: dst.to_path_buf(),
                attempts: retries + 1,
                source: err,
            });
        }

        let backoff = backoff_for_attempt(attempt);
        logger.warn(&format!(
            "Copy failed (attempt {}/{}) for {}: {}. Retrying in {:.2?}...",
            attempt + 1,
            retries + 1,
            src.display(),
            err,
            backoff
        ));

        tokio::select! {
            () = cancel.fired() => return Err(EngineError::Cancelled),
            () = tokio::time::sleep(backoff) => {}
        }
        attempt += 1;
    }
}

/// Backoff before the next copy attempt: small and capped, so a run recovers
/// quickly from brief glitches without stalling for minutes.
const fn backoff_for_attempt(attempt: u32) -> Duration {
    match attempt {
        0 => Duration::from_millis(250),
        1 => Duration::from_secs(1),
        _ => Duration::from_secs(3),
    }
}

/// One streaming copy attempt.
///
/// Writes into `<dst>.tmp`, closes the handle, then renames onto `dst`; the
/// rename happens with the handle closed because some platforms require it.
/// Any failure removes the temporary file, so a partial copy is never
/// observable at the destination.
fn copy_stream(src: &Path, dst: &Path) -> std::io::Result<()> {
    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut input = File::open(src)?;
    let tmp = tmp_path(dst);

    if let Err(err) = write_tmp(&mut input, &tmp) {
        let _ = std::fs::remove_file(&tmp);
        return Err(err);
    }

    std::fs::rename(&tmp, dst).inspect_err(|_| {
        let _ = std::fs::remove_file(&tmp);
    })
}

fn write_tmp(input: &mut File, tmp: &Path) -> std::io::Result<()> {
    let mut output = File::create(tmp)?;
    let mut buf = vec![0_u8; COPY_BUFFER_LEN];
    loop {
        let read = input.read(&mut buf)?;
        if read == 0 {
            break;
        }
        output.write_all(&buf[..read])?;
    }
    // Dropping `output` here closes the handle before the caller renames.
    Ok(())
}

fn tmp_path(dst: &Path) -> PathBuf {
    let mut raw = dst.as_os_str().to_os_string();
    raw.push(".tmp");
    PathBuf::from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use relic_telemetry::LogSettings;
    use tempfile::TempDir;

    fn console_logger(dir: &TempDir) -> Logger {
        Logger::new(
            dir.path(),
            LogSettings {
                no_logs: true,
                log_dir: PathBuf::new(),
            },
        )
        .expect("logger should build")
    }

    #[test]
    fn destination_preserves_relative_structure() {
        let dst = backup_dest_path(
            Path::new("/bk"),
            "30Jan26",
            Path::new("/data"),
            Path::new("/data/images/2026/img.jpg"),
        )
        .expect("path should build");
        assert_eq!(dst, PathBuf::from("/bk/30Jan26/images/2026/img.jpg"));
    }

    #[test]
    fn intra_root_traversal_collapses() {
        let dst = backup_dest_path(
            Path::new("/bk"),
            "30Jan26",
            Path::new("/data"),
            Path::new("/data/a/../b/file.txt"),
        )
        .expect("path should build");
        assert_eq!(dst, PathBuf::from("/bk/30Jan26/b/file.txt"));
    }

    #[test]
    fn escaping_source_is_rejected() {
        let err = backup_dest_path(
            Path::new("/bk"),
            "30Jan26",
            Path::new("/data"),
            Path::new("/data/../etc/passwd"),
        )
        .expect_err("escape must be rejected");
        assert!(matches!(err, EngineError::PathEscapesRoot { .. }));

        let sibling = backup_dest_path(
            Path::new("/bk"),
            "30Jan26",
            Path::new("/data"),
            Path::new("/other/file.txt"),
        );
        assert!(sibling.is_err());
    }

    #[test]
    fn normalize_clamps_absolute_paths_at_root() {
        assert_eq!(normalize(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
    }

    #[test]
    fn backoff_is_monotonic_and_capped() {
        assert_eq!(backoff_for_attempt(0), Duration::from_millis(250));
        assert_eq!(backoff_for_attempt(1), Duration::from_secs(1));
        assert_eq!(backoff_for_attempt(2), Duration::from_secs(3));
        assert_eq!(backoff_for_attempt(9), Duration::from_secs(3));
    }

    #[test]
    fn copy_stream_round_trips_bytes_without_tmp_residue() {
        let dir = TempDir::new().expect("tempdir");
        let src = dir.path().join("src.bin");
        let dst = dir.path().join("nested/dst.bin");
        let payload = vec![7_u8; COPY_BUFFER_LEN + 13];
        std::fs::write(&src, &payload).expect("write source");

        copy_stream(&src, &dst).expect("copy should succeed");

        assert_eq!(std::fs::read(&dst).expect("read destination"), payload);
        assert!(!tmp_path(&dst).exists());
    }

    #[test]
    fn failed_copy_leaves_no_partial_file() {
        let dir = TempDir::new().expect("tempdir");
        let src = dir.path().join("missing.bin");
        let dst = dir.path().join("dst.bin");

        assert!(copy_stream(&src, &dst).is_err());
        assert!(!dst.exists());
        assert!(!tmp_path(&dst).exists());
    }

    #[tokio::test]
    async fn retry_exhaustion_reports_attempt_count() {
        let dir = TempDir::new().expect("tempdir");
        let logger = console_logger(&dir);
        let cancel = CancelSignal::new();
        let src = dir.path().join("missing.bin");
        let dst = dir.path().join("dst.bin");

        let err = copy_with_retry(&src, &dst, 1, &cancel, &logger)
            .await
            .expect_err("copy must fail");
        match err {
            EngineError::Copy { attempts, .. } => assert_eq!(attempts, 2),
            other => panic!("expected copy error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn cancel_aborts_between_attempts() {
        let dir = TempDir::new().expect("tempdir");
        let logger = console_logger(&dir);
        let cancel = CancelSignal::new();
        cancel.fire();

        let err = copy_with_retry(
            &dir.path().join("missing"),
            &dir.path().join("dst"),
            5,
            &cancel,
            &logger,
        )
        .await
        .expect_err("cancelled run must not copy");
        assert!(matches!(err, EngineError::Cancelled));
    }
}

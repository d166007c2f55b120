//! Walker pool, serialized processor, and the run controller.
//!
//! Discovery and file operations are deliberately split: directory metadata
//! scans parallelize well (and hide network round-trip latency), while
//! copy+delete stays on a single dedicated task so load on the destination
//! share is predictable. A bounded queue between the two provides
//! backpressure when walking outruns processing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Instant, SystemTime};

use relic_telemetry::Logger;
use tokio::sync::{Semaphore, mpsc};
use walkdir::WalkDir;

use crate::backup;
use crate::cancel::CancelSignal;
use crate::error::{EngineError, EngineResult};
use crate::model::{FileJob, RootKind, RootSpec, RunOptions, RunReport};
use crate::reclaim;
use crate::retention;

/// Maintenance engine: scans the configured roots for aged files, optionally
/// backs each one up, deletes it, and reclaims emptied directories.
pub struct MaintenanceEngine {
    options: RunOptions,
    logger: Arc<Logger>,
}

/// Shared state for one run, owned by the run controller and handed to every
/// task explicitly. There is no other shared mutable state in the engine.
struct RunContext {
    options: RunOptions,
    cutoff: SystemTime,
    date_label: String,
    start: Instant,
    cancel: CancelSignal,
    processed: AtomicU64,
    first_error: Mutex<Option<EngineError>>,
    deleted_per_root: Mutex<HashMap<PathBuf, u64>>,
    logger: Arc<Logger>,
}

impl RunContext {
    /// Stop predicate consulted by walkers and the processor at safe points.
    fn should_stop(&self) -> bool {
        let options = &self.options;
        if !options.max_runtime.is_zero() && self.start.elapsed() >= options.max_runtime {
            return true;
        }
        if options.max_files > 0 && self.processed.load(Ordering::Relaxed) >= options.max_files {
            return true;
        }
        false
    }

    fn mark_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    /// Write-once error latch; the first writer wins.
    fn latch_error(&self, err: EngineError) {
        let mut guard = self
            .first_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if guard.is_none() {
            *guard = Some(err);
        }
    }

    fn take_first_error(&self) -> Option<EngineError> {
        self.first_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Incremented exclusively on a successful delete.
    fn record_deleted(&self, root: &Path) {
        let mut guard = self
            .deleted_per_root
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *guard.entry(root.to_path_buf()).or_default() += 1;
    }

    fn deleted_count(&self, root: &Path) -> u64 {
        self.deleted_per_root
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(root)
            .copied()
            .unwrap_or(0)
    }

    fn deleted_total(&self) -> u64 {
        self.deleted_per_root
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .sum()
    }
}

impl MaintenanceEngine {
    /// Build an engine for one run configuration. Degenerate option values
    /// are clamped to safe defaults.
    #[must_use]
    pub fn new(options: RunOptions, logger: Arc<Logger>) -> Self {
        Self {
            options: options.normalized(),
            logger,
        }
    }

    /// Process every planned root: discover aged files, back them up when
    /// requested, delete them, and reclaim emptied directories.
    ///
    /// The caller is expected to have validated the backup destination with
    /// [`crate::verify_backup_root`] when any root has backup enabled.
    ///
    /// Per-item failures are logged and never fail the run. Shutdown order
    /// is fixed: walkers join, the queue closes, the processor drains or
    /// exits early on a stop condition, and only then are per-root totals
    /// reported so counts are never partial.
    ///
    /// # Errors
    ///
    /// Returns the first hard error latched during the run: a root that
    /// could not be walked at all. Stop-condition exits are not errors; they
    /// produce an advisory log line and a report with `stopped_early` set.
    pub async fn run(&self, roots: Vec<RootSpec>) -> EngineResult<RunReport> {
        self.logger.info("Starting maintenance worker");

        let ctx = Arc::new(RunContext {
            options: self.options.clone(),
            cutoff: retention::cutoff_from_days(self.options.retention_days),
            date_label: backup::run_date_label(),
            start: Instant::now(),
            cancel: CancelSignal::new(),
            processed: AtomicU64::new(0),
            first_error: Mutex::new(None),
            deleted_per_root: Mutex::new(HashMap::new()),
            logger: Arc::clone(&self.logger),
        });

        let (tx, rx) = mpsc::channel::<FileJob>(ctx.options.queue_capacity);
        let processor = tokio::spawn(process_jobs(Arc::clone(&ctx), rx));

        let semaphore = Arc::new(Semaphore::new(ctx.options.walker_count));
        let mut walkers = Vec::with_capacity(roots.len());
        for root in &roots {
            // No new walkers once a stop condition is met.
            if ctx.should_stop() {
                break;
            }
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                break;
            };
            let walker_ctx = Arc::clone(&ctx);
            let walker_tx = tx.clone();
            let root = root.clone();
            walkers.push(tokio::spawn(async move {
                let _permit = permit;
                walk_root(&walker_ctx, &root, &walker_tx).await;
            }));
        }
        drop(tx);

        for walker in walkers {
            if let Err(err) = walker.await {
                self.logger.error(&format!("Walker task failed: {err}"));
            }
        }
        // All senders are gone at this point; the queue is closed and the
        // processor exits once it has drained the remainder.
        if let Err(err) = processor.await {
            self.logger.error(&format!("Processor task failed: {err}"));
        }

        report_totals(&ctx, &roots);

        if let Some(err) = ctx.take_first_error() {
            return Err(err);
        }

        let processed = ctx.processed.load(Ordering::Relaxed);
        let mut stopped_early = false;
        if !self.options.max_runtime.is_zero() && ctx.start.elapsed() >= self.options.max_runtime {
            self.logger.warn(&format!(
                "Stopped due to max runtime ({:.2?}). Jobs handled: {processed}",
                self.options.max_runtime
            ));
            stopped_early = true;
        }
        if self.options.max_files > 0 && processed >= self.options.max_files {
            self.logger.warn(&format!(
                "Stopped due to max files ({}). Jobs handled: {processed}",
                self.options.max_files
            ));
            stopped_early = true;
        }

        Ok(RunReport {
            processed,
            deleted: ctx.deleted_total(),
            stopped_early,
        })
    }
}

/// Discover aged files under one root and enqueue them.
///
/// Per-entry failures are logged and skipped. A root whose directory listing
/// cannot be opened at all latches the run's first error and fires the
/// cancel signal.
async fn walk_root(ctx: &RunContext, root: &RootSpec, tx: &mpsc::Sender<FileJob>) {
    if ctx.cancel.is_fired() {
        return;
    }
    let logger = &ctx.logger;

    let metadata = match std::fs::metadata(&root.path) {
        Ok(metadata) => metadata,
        Err(err) => {
            logger.error(&format!(
                "Error accessing path {}: {err}",
                root.path.display()
            ));
            return;
        }
    };

    // Individual files can be listed directly in the config; they skip the
    // walk entirely.
    if !metadata.is_dir() {
        walk_file_root(ctx, root, &metadata, tx).await;
        return;
    }

    logger.info(&format!("Processing folder: {}", root.path.display()));

    for entry in WalkDir::new(&root.path) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                if err.depth() == 0 || err.path() == Some(root.path.as_path()) {
                    // The root listing itself failed: hard walk error.
                    ctx.latch_error(EngineError::Walk {
                        path: root.path.clone(),
                        source: err,
                    });
                    ctx.cancel.fire();
                    return;
                }
                let at = err
                    .path()
                    .map_or_else(|| root.path.clone(), Path::to_path_buf);
                logger.error(&format!("Walk error ({}): {err}", at.display()));
                continue;
            }
        };

        if ctx.cancel.is_fired() || ctx.should_stop() {
            return;
        }

        if !entry.file_type().is_file() {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(err) => {
                logger.error(&format!("Info error {}: {err}", entry.path().display()));
                continue;
            }
        };
        let Ok(modified) = metadata.modified() else {
            continue;
        };
        if !retention::is_older_than(modified, ctx.cutoff) {
            continue;
        }

        let job = FileJob {
            src_path: entry.into_path(),
            root_path: root.path.clone(),
            backup_enabled: root.backup_enabled,
        };
        if !enqueue(ctx, tx, job).await {
            return;
        }
    }

    logger.info(&format!("Finished walking folder: {}", root.path.display()));
}

/// Handle a root that names a single file: one age check, one job.
async fn walk_file_root(
    ctx: &RunContext,
    root: &RootSpec,
    metadata: &std::fs::Metadata,
    tx: &mpsc::Sender<FileJob>,
) {
    let logger = &ctx.logger;

    let Ok(modified) = metadata.modified() else {
        logger.error(&format!(
            "Info error {}: modification time unavailable",
            root.path.display()
        ));
        return;
    };
    if !retention::is_older_than(modified, ctx.cutoff) {
        logger.debug(&format!(
            "File is not old enough, skipping: {}",
            root.path.display()
        ));
        return;
    }

    // The parent directory doubles as the counting key and the reclamation
    // boundary for file roots.
    let Some(parent) = root.path.parent() else {
        logger.error(&format!(
            "Cannot determine parent directory for {}",
            root.path.display()
        ));
        return;
    };

    let job = FileJob {
        src_path: root.path.clone(),
        root_path: parent.to_path_buf(),
        backup_enabled: root.backup_enabled,
    };
    if enqueue(ctx, tx, job).await {
        logger.info(&format!("Queued file for deletion: {}", root.path.display()));
    }
}

/// Cancel-aware enqueue. Blocks while the queue is full; returns `false`
/// when the walk should end (cancelled, or the processor is gone).
async fn enqueue(ctx: &RunContext, tx: &mpsc::Sender<FileJob>, job: FileJob) -> bool {
    tokio::select! {
        () = ctx.cancel.fired() => false,
        sent = tx.send(job) => sent.is_ok(),
    }
}

/// The single processor: dequeues jobs until the queue is closed and
/// drained, or a stop condition ends the run early.
async fn process_jobs(ctx: Arc<RunContext>, mut jobs: mpsc::Receiver<FileJob>) {
    while let Some(job) = jobs.recv().await {
        if ctx.should_stop() {
            ctx.logger.info("Stop condition met, halting processing");
            // Jobs still buffered stay unprocessed and uncounted; walkers
            // observe the same stop condition and quit producing.
            return;
        }

        handle_job(&ctx, &job).await;
        ctx.mark_processed();

        if !ctx.options.cooldown.is_zero() {
            tokio::select! {
                () = ctx.cancel.fired() => return,
                () = tokio::time::sleep(ctx.options.cooldown) => {}
            }
        }
    }
}

/// Process one job: destination construction, optional backup, delete, and
/// reclamation. Every outcome counts as "handled"; the caller increments the
/// processed counter exactly once afterwards.
async fn handle_job(ctx: &RunContext, job: &FileJob) {
    let logger = &ctx.logger;

    let dst = match backup::backup_dest_path(
        &ctx.options.backup_root,
        &ctx.date_label,
        &job.root_path,
        &job.src_path,
    ) {
        Ok(dst) => dst,
        Err(err) => {
            logger.error(&format!(
                "Building backup path failed for {}: {err}",
                job.src_path.display()
            ));
            return;
        }
    };

    if job.backup_enabled {
        if retention::path_exists(&dst) {
            // A destination left behind by an earlier run with the same date
            // label; skipping the copy makes reruns idempotent.
            logger.warn(&format!(
                "File already exists in backup, skipping: {}",
                dst.display()
            ));
        } else if let Err(err) = backup::copy_with_retry(
            &job.src_path,
            &dst,
            ctx.options.retries,
            &ctx.cancel,
            logger,
        )
        .await
        {
            logger.error(&format!(
                "Backup failed for {} -> {}: {err}",
                job.src_path.display(),
                dst.display()
            ));
            // No delete without a successful backup.
            return;
        } else {
            logger.success(&format!(
                "Backed up: {} -> {}",
                job.src_path.display(),
                dst.display()
            ));
        }
    }

    if let Err(err) = reclaim::delete_file(&job.src_path) {
        logger.error(&format!(
            "Delete failed for {}: {err}",
            job.src_path.display()
        ));
        return;
    }
    logger.success(&format!("Deleted: {}", job.src_path.display()));

    ctx.record_deleted(&job.root_path);
    if let Some(parent) = job.src_path.parent() {
        reclaim::reclaim_empty_dirs(parent, &job.root_path, logger);
    }
}

/// Per-root totals, emitted only after the processor has fully stopped so
/// counts are never partial. Directory roots get a COUNT line; single-file
/// roots get a per-file SUCCESS line when the file was removed.
fn report_totals(ctx: &RunContext, roots: &[RootSpec]) {
    for root in roots {
        match root.kind {
            RootKind::Directory => {
                let count = ctx.deleted_count(&root.path);
                ctx.logger.count(&format!(
                    "Files deleted from folder {}: {count}",
                    root.path.display()
                ));
            }
            RootKind::File => {
                let deleted = root
                    .path
                    .parent()
                    .is_some_and(|parent| ctx.deleted_count(parent) > 0);
                if deleted {
                    ctx.logger
                        .success(&format!("File deleted: {}", root.path.display()));
                }
            }
        }
    }
}

//! Run inputs and outputs shared across the engine.

use std::path::PathBuf;
use std::time::Duration;

/// Classification of a configured root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootKind {
    /// The root is a directory and is walked recursively.
    Directory,
    /// The root names a single file.
    File,
}

/// One configured top-level path to maintain.
///
/// Created by `plan_roots` from operator configuration and immutable for the
/// rest of the run. Input order is preserved so run caps consume roots in
/// the order the operator listed them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootSpec {
    /// Absolute path of the root.
    pub path: PathBuf,
    /// Whether files under this root are copied before deletion.
    pub backup_enabled: bool,
    /// Directory or single-file root.
    pub kind: RootKind,
}

/// One candidate file selected for processing.
///
/// Produced by the walkers and consumed exactly once by the processor. For
/// single-file roots `root_path` is the file's parent directory: destination
/// paths and the reclamation boundary both derive from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileJob {
    /// Full path of the candidate file.
    pub src_path: PathBuf,
    /// Root the file was discovered under.
    pub root_path: PathBuf,
    /// Backup setting inherited from the owning root.
    pub backup_enabled: bool,
}

/// Tunables for one maintenance run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Only files strictly older than `now - retention_days` are eligible.
    /// Zero selects every existing file.
    pub retention_days: u32,
    /// Destination directory for dated backups.
    pub backup_root: PathBuf,
    /// Concurrent root walkers. Values below one are treated as one.
    pub walker_count: usize,
    /// Capacity of the job queue between walkers and the processor. Values
    /// below one are treated as the default.
    pub queue_capacity: usize,
    /// Cap on jobs the processor handles in one run. Zero means unlimited.
    pub max_files: u64,
    /// Best-effort cap on total run time. Zero means unlimited.
    pub max_runtime: Duration,
    /// Sleep inserted after each handled job to smooth out IO bursts.
    pub cooldown: Duration,
    /// Copy retry attempts after the first failure.
    pub retries: u32,
}

impl RunOptions {
    /// Default queue capacity between walkers and the processor.
    pub const DEFAULT_QUEUE_CAPACITY: usize = 300;

    /// Clamp values that would otherwise break the pipeline.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.walker_count < 1 {
            self.walker_count = 1;
        }
        if self.queue_capacity < 1 {
            self.queue_capacity = Self::DEFAULT_QUEUE_CAPACITY;
        }
        self
    }
}

/// Outcome summary returned by a completed run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Jobs the processor handled, regardless of outcome.
    pub processed: u64,
    /// Successful deletions across every root.
    pub deleted: u64,
    /// Whether a run cap (max files or max runtime) ended the run early.
    pub stopped_early: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_clamps_degenerate_values() {
        let options = RunOptions {
            retention_days: 7,
            backup_root: PathBuf::from("/bk"),
            walker_count: 0,
            queue_capacity: 0,
            max_files: 0,
            max_runtime: Duration::ZERO,
            cooldown: Duration::ZERO,
            retries: 2,
        }
        .normalized();

        assert_eq!(options.walker_count, 1);
        assert_eq!(options.queue_capacity, RunOptions::DEFAULT_QUEUE_CAPACITY);
    }
}

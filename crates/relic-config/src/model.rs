//! Typed configuration consumed by the application wiring.

use std::path::PathBuf;

/// One configured path to maintain, with its backup setting.
///
/// The path may name a directory or an individual file; classification
/// happens later, when the run plans its roots against the live filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootEntry {
    /// Absolute path of the directory or file to process.
    pub path: PathBuf,
    /// Whether eligible files under this path are copied before deletion.
    pub backup_enabled: bool,
}

/// Everything read from `config.ini`.
///
/// Input order of `roots` is preserved: operators rely on it when run caps
/// limit how much work a single run performs.
#[derive(Debug, Clone)]
pub struct MaintenanceConfig {
    /// Destination directory receiving dated backups.
    pub backup_root: PathBuf,
    /// Ordered list of paths to process.
    pub roots: Vec<RootEntry>,
}

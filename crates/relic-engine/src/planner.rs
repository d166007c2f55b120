//! Root classification from configured path entries.

use std::path::PathBuf;

use crate::model::{RootKind, RootSpec};

/// Turn ordered `(path, backup_enabled)` pairs into classified roots.
///
/// Each path is probed once. Probe failures (missing path, permissions)
/// retain the entry as a directory root; the walker logs and skips it at run
/// time, which keeps planning free of filesystem error handling.
///
/// Input order is preserved and nothing is deduplicated: when run caps limit
/// the work, operators rely on "process A before B" ordering.
#[must_use]
pub fn plan_roots(entries: impl IntoIterator<Item = (PathBuf, bool)>) -> Vec<RootSpec> {
    entries
        .into_iter()
        .map(|(path, backup_enabled)| {
            let kind = match std::fs::metadata(&path) {
                Ok(metadata) if !metadata.is_dir() => RootKind::File,
                _ => RootKind::Directory,
            };
            RootSpec {
                path,
                backup_enabled,
                kind,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn classifies_files_directories_and_missing_paths() {
        let dir = TempDir::new().expect("tempdir");
        let file = dir.path().join("single.txt");
        std::fs::write(&file, b"x").expect("write file");
        let missing = dir.path().join("absent");

        let roots = plan_roots(vec![
            (dir.path().to_path_buf(), true),
            (file.clone(), false),
            (missing.clone(), true),
        ]);

        assert_eq!(roots.len(), 3);
        assert_eq!(roots[0].kind, RootKind::Directory);
        assert_eq!(roots[1].kind, RootKind::File);
        assert!(!roots[1].backup_enabled);
        // Unknown paths default to directory; the walker skips them later.
        assert_eq!(roots[2].kind, RootKind::Directory);
    }

    #[test]
    fn preserves_input_order() {
        let dir = TempDir::new().expect("tempdir");
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        std::fs::create_dir_all(&a).expect("create a");
        std::fs::create_dir_all(&b).expect("create b");

        let roots = plan_roots(vec![(b.clone(), true), (a.clone(), true), (b.clone(), false)]);
        let order: Vec<_> = roots.iter().map(|root| root.path.clone()).collect();
        assert_eq!(order, vec![b.clone(), a, b]);
    }
}

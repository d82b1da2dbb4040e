//! # Scan
//!
//! Depth-first walk of the mock tree used by fallback lookup and listing.
//!
//! Children are visited in lexicographic name order, directories recursed
//! into where they appear, so "the first match" is stable across runs and
//! platforms. A directory that cannot be listed is skipped with a warning:
//! results on a permission-restricted tree may be partial. In-flight
//! temporary files from atomic writes are never reported.

use super::backend::{is_temp_artifact, DirEntry, EntryKind, StorageBackend};
use crate::error::{MockError, Result};
use std::path::{Path, PathBuf};

/// Every file below `root` whose name contains `needle` (case-sensitive).
pub fn search<B: StorageBackend>(backend: &B, root: &Path, needle: &str) -> Result<Vec<PathBuf>> {
    let mut matches = Vec::new();
    walk(backend, root, &mut |_dir: &Path, entry: &DirEntry| {
        if entry.name.contains(needle) {
            matches.push(entry.path.clone());
        }
    })?;
    tracing::debug!(root = %root.display(), needle, found = matches.len(), "search complete");
    Ok(matches)
}

/// Calls `visit(parent_dir, file)` for every file below `root`.
///
/// Fails with `NotFound` if `root` is not a directory. Listing errors, the
/// root's included, only drop the affected subtree.
pub fn walk<B, F>(backend: &B, root: &Path, visit: &mut F) -> Result<()>
where
    B: StorageBackend,
    F: FnMut(&Path, &DirEntry),
{
    match backend.entry_kind(root)? {
        Some(EntryKind::Dir) => {}
        _ => {
            return Err(MockError::NotFound(format!(
                "mock root {}",
                root.display()
            )))
        }
    }
    visit_dir(backend, root, visit);
    Ok(())
}

fn visit_dir<B, F>(backend: &B, dir: &Path, visit: &mut F)
where
    B: StorageBackend,
    F: FnMut(&Path, &DirEntry),
{
    let mut children = match backend.list_dir(dir) {
        Ok(children) => children,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable directory");
            return;
        }
    };
    tracing::trace!(dir = %dir.display(), entries = children.len(), "scanning");
    children.sort_by(|a, b| a.name.cmp(&b.name));

    for child in &children {
        match child.kind {
            EntryKind::Dir => visit_dir(backend, &child.path, visit),
            EntryKind::File if is_temp_artifact(&child.name) => {}
            EntryKind::File => visit(dir, child),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;

    fn tree() -> MemBackend {
        let backend = MemBackend::new();
        for (dir, file) in [
            ("/m/b", "login_b.json"),
            ("/m/a", "login_a.json"),
            ("/m/a", "orders_a.json"),
            ("/m/a/nested", "login_nested.json"),
        ] {
            backend.create_dir_all(Path::new(dir)).unwrap();
            backend
                .write_atomic(&Path::new(dir).join(file), b"{}")
                .unwrap();
        }
        backend
    }

    #[test]
    fn finds_all_matches_in_lexicographic_preorder() {
        let backend = tree();
        let found = search(&backend, Path::new("/m"), "login").unwrap();
        assert_eq!(
            found,
            vec![
                PathBuf::from("/m/a/login_a.json"),
                PathBuf::from("/m/a/nested/login_nested.json"),
                PathBuf::from("/m/b/login_b.json"),
            ]
        );
    }

    #[test]
    fn match_is_case_sensitive() {
        let backend = tree();
        assert!(search(&backend, Path::new("/m"), "LOGIN").unwrap().is_empty());
    }

    #[test]
    fn results_do_not_accumulate_across_calls() {
        let backend = tree();
        let first = search(&backend, Path::new("/m"), "orders").unwrap();
        let second = search(&backend, Path::new("/m"), "orders").unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(second, first);
    }

    #[test]
    fn unreadable_subtree_is_skipped() {
        let backend = tree();
        backend.deny("/m/a");
        let found = search(&backend, Path::new("/m"), "login").unwrap();
        assert_eq!(found, vec![PathBuf::from("/m/b/login_b.json")]);
    }

    #[test]
    fn unreadable_root_yields_nothing() {
        let backend = tree();
        backend.deny("/m");
        assert!(search(&backend, Path::new("/m"), "login").unwrap().is_empty());
    }

    #[test]
    fn missing_root_is_not_found() {
        let backend = MemBackend::new();
        let err = search(&backend, Path::new("/nowhere"), "x").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn file_root_is_not_found() {
        let backend = tree();
        let err = search(&backend, Path::new("/m/a/login_a.json"), "login").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn temp_artifacts_are_ignored() {
        let backend = tree();
        backend
            .write_atomic(Path::new("/m/a/.login-123.tmp"), b"partial")
            .unwrap();
        let found = search(&backend, Path::new("/m"), "login").unwrap();
        assert_eq!(found.len(), 3);
    }
}

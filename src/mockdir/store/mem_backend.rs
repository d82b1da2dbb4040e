use super::backend::{DirEntry, EntryKind, FileMeta, StorageBackend};
use crate::error::{MockError, Result};
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Clone)]
enum Node {
    Dir,
    File {
        bytes: Vec<u8>,
        mtime: DateTime<Utc>,
    },
}

/// In-memory storage backend for testing.
///
/// Paths are taken literally; [`absolute`](StorageBackend::absolute) roots
/// relative paths at `/`. Uses `RefCell` for interior mutability since the
/// store is single-threaded.
pub struct MemBackend {
    nodes: RefCell<BTreeMap<PathBuf, Node>>,
    denied: RefCell<BTreeSet<PathBuf>>,
    simulate_write_error: RefCell<bool>,
}

impl Default for MemBackend {
    fn default() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(PathBuf::from("/"), Node::Dir);
        Self {
            nodes: RefCell::new(nodes),
            denied: RefCell::new(BTreeSet::new()),
            simulate_write_error: RefCell::new(false),
        }
    }
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Make a directory behave as if the process lacked permission to read
    /// it: listing it, or touching anything beneath it, fails.
    pub fn deny(&self, path: impl AsRef<Path>) {
        self.denied.borrow_mut().insert(path.as_ref().to_path_buf());
    }

    /// Test helper to set mtime directly.
    /// Returns true if the file existed and was updated.
    pub fn set_mtime(&self, path: impl AsRef<Path>, when: DateTime<Utc>) -> bool {
        match self.nodes.borrow_mut().get_mut(path.as_ref()) {
            Some(Node::File { mtime, .. }) => {
                *mtime = when;
                true
            }
            _ => false,
        }
    }

    fn check_access(&self, path: &Path, include_self: bool) -> Result<()> {
        let denied = self.denied.borrow();
        let blocked = path
            .ancestors()
            .skip(if include_self { 0 } else { 1 })
            .any(|a| denied.contains(a));
        if blocked {
            return Err(MockError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {}", path.display()),
            )));
        }
        Ok(())
    }
}

impl StorageBackend for MemBackend {
    fn entry_kind(&self, path: &Path) -> Result<Option<EntryKind>> {
        self.check_access(path, false)?;
        Ok(self.nodes.borrow().get(path).map(|node| match node {
            Node::Dir => EntryKind::Dir,
            Node::File { .. } => EntryKind::File,
        }))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.check_access(path, false)?;
        let mut nodes = self.nodes.borrow_mut();
        let missing: Vec<PathBuf> = path
            .ancestors()
            .filter(|a| !a.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .collect();
        for dir in missing.into_iter().rev() {
            match nodes.get(&dir) {
                Some(Node::Dir) => {}
                Some(Node::File { .. }) => {
                    return Err(MockError::Io(io::Error::new(
                        io::ErrorKind::AlreadyExists,
                        format!("not a directory: {}", dir.display()),
                    )));
                }
                None => {
                    nodes.insert(dir, Node::Dir);
                }
            }
        }
        Ok(())
    }

    fn write_atomic(&self, path: &Path, content: &[u8]) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(MockError::Io(io::Error::other("simulated write error")));
        }
        self.check_access(path, false)?;

        let mut nodes = self.nodes.borrow_mut();
        let parent_is_dir = path
            .parent()
            .is_some_and(|p| matches!(nodes.get(p), Some(Node::Dir)));
        if !parent_is_dir {
            return Err(MockError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no parent directory for {}", path.display()),
            )));
        }
        if matches!(nodes.get(path), Some(Node::Dir)) {
            return Err(MockError::Io(io::Error::other(format!(
                "is a directory: {}",
                path.display()
            ))));
        }
        nodes.insert(
            path.to_path_buf(),
            Node::File {
                bytes: content.to_vec(),
                mtime: Utc::now(),
            },
        );
        Ok(())
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.check_access(path, false)?;
        match self.nodes.borrow().get(path) {
            Some(Node::File { bytes, .. }) => Ok(bytes.clone()),
            Some(Node::Dir) => Err(MockError::Io(io::Error::other(format!(
                "is a directory: {}",
                path.display()
            )))),
            None => Err(MockError::NotFound(path.display().to_string())),
        }
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        self.check_access(path, true)?;
        let nodes = self.nodes.borrow();
        if !matches!(nodes.get(path), Some(Node::Dir)) {
            return Err(MockError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {}", path.display()),
            )));
        }
        Ok(nodes
            .iter()
            .filter(|(p, _)| p.parent() == Some(path))
            .map(|(p, node)| DirEntry {
                name: p
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                path: p.clone(),
                kind: match node {
                    Node::Dir => EntryKind::Dir,
                    Node::File { .. } => EntryKind::File,
                },
            })
            .collect())
    }

    fn metadata(&self, path: &Path) -> Result<FileMeta> {
        self.check_access(path, false)?;
        match self.nodes.borrow().get(path) {
            Some(Node::File { bytes, mtime }) => Ok(FileMeta {
                size: bytes.len() as u64,
                modified: Some(*mtime),
            }),
            Some(Node::Dir) => Ok(FileMeta {
                size: 0,
                modified: None,
            }),
            None => Err(MockError::NotFound(path.display().to_string())),
        }
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            Path::new("/").join(path)
        }
    }
}

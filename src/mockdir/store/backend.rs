use crate::error::Result;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

/// One child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

/// Abstract interface for the hierarchical file tree the store lives in.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while `Layout` and `MockStore` handle the "where" and "what".
pub trait StorageBackend {
    /// What lives at `path`.
    /// Returns Ok(None) if nothing does.
    /// Returns Err only on actual I/O errors (permissions, disk failure).
    fn entry_kind(&self, path: &Path) -> Result<Option<EntryKind>>;

    /// Create `path` and any missing ancestors. Succeeds if it already exists.
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Create or truncate the file at `path` with `content`.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn write_atomic(&self, path: &Path, content: &[u8]) -> Result<()>;

    /// Read the whole file.
    /// Returns `MockError::NotFound` if it does not exist, `MockError::Io` otherwise.
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Immediate children of a directory, in no particular order.
    /// Symlinks to directories are left out so a walk cannot loop.
    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>>;

    fn metadata(&self, path: &Path) -> Result<FileMeta>;

    /// Resolve `path` against the backend's notion of a working directory.
    fn absolute(&self, path: &Path) -> PathBuf;
}

/// Name shape of in-flight files produced by [`StorageBackend::write_atomic`].
pub fn is_temp_artifact(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(".tmp")
}

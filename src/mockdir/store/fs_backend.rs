use super::backend::{DirEntry, EntryKind, FileMeta, StorageBackend};
use crate::error::{MockError, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Storage backend over the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsBackend;

impl FsBackend {
    pub fn new() -> Self {
        Self
    }
}

impl StorageBackend for FsBackend {
    fn entry_kind(&self, path: &Path) -> Result<Option<EntryKind>> {
        match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => Ok(Some(EntryKind::Dir)),
            Ok(_) => Ok(Some(EntryKind::File)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(MockError::Io(e)),
        }
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(MockError::Io)
    }

    fn write_atomic(&self, path: &Path, content: &[u8]) -> Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let tmp_path = parent.join(format!(".{}.tmp", Uuid::new_v4()));

        if let Err(e) = fs::write(&tmp_path, content) {
            let _ = fs::remove_file(&tmp_path);
            return Err(MockError::Io(e));
        }
        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(MockError::Io(e));
        }
        Ok(())
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => MockError::NotFound(path.display().to_string()),
            _ => MockError::Io(e),
        })
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).map_err(MockError::Io)? {
            let entry = entry.map_err(MockError::Io)?;
            let child = entry.path();
            let file_type = entry.file_type().map_err(MockError::Io)?;
            let kind = if file_type.is_dir() {
                EntryKind::Dir
            } else if file_type.is_symlink() && child.is_dir() {
                // never descended into, a link back up the tree would loop
                tracing::debug!(path = %child.display(), "skipping directory symlink");
                continue;
            } else {
                EntryKind::File
            };
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: child,
                kind,
            });
        }
        Ok(entries)
    }

    fn metadata(&self, path: &Path) -> Result<FileMeta> {
        let meta = fs::metadata(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => MockError::NotFound(path.display().to_string()),
            _ => MockError::Io(e),
        })?;
        let modified = meta.modified().ok().map(DateTime::<Utc>::from);
        Ok(FileMeta {
            size: meta.len(),
            modified,
        })
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
    }
}

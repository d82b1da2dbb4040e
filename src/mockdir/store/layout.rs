//! # Layout
//!
//! Where mocks live on disk, and how directories are created and measured.
//!
//! ## Placement
//!
//! An identity normally gets a directory straight under the root:
//!
//! ```text
//! <root>/
//! ├── u1/
//! │   ├── login_u1.json
//! │   └── orders_u1.json
//! └── u2/
//!     └── login_u2.json
//! ```
//!
//! Once a directory holds `max_entries_per_dir` sub-directories it is at
//! capacity, and new identities overflow into a shard directory named after
//! one byte of the identity's SHA-256 digest. Depth `n` uses byte `n`, so a
//! full shard overflows the same way one level further down:
//!
//! ```text
//! <root>/
//! ├── u1/  u2/  u3/
//! └── ~4e/
//!     ├── u4/
//!     └── ~a1/
//!         └── u9/
//! ```
//!
//! Placement is sticky: an identity already found somewhere is never moved.
//! Shard directories count towards their parent's capacity like any other
//! sub-directory.

use super::backend::{EntryKind, StorageBackend};
use crate::error::{MockError, Result};
use crate::model::SHARD_PREFIX;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// One shard level per byte of a SHA-256 digest.
pub const MAX_SHARD_DEPTH: usize = 32;

pub struct Layout<'a, B: StorageBackend> {
    backend: &'a B,
    max_entries: usize,
}

impl<'a, B: StorageBackend> Layout<'a, B> {
    pub fn new(backend: &'a B, max_entries: usize) -> Self {
        Self {
            backend,
            max_entries: max_entries.max(1),
        }
    }

    /// Whether anything named `name` exists directly under `base`.
    pub fn exists(&self, base: &Path, name: &str) -> Result<bool> {
        Ok(self.backend.entry_kind(&base.join(name))?.is_some())
    }

    /// Create `base/name` with all missing ancestors.
    ///
    /// Returns whether the directory exists afterwards. A `true` does not say
    /// whether it was created by this call or was already there.
    pub fn ensure_dir(&self, base: &Path, name: &str) -> Result<bool> {
        let path = base.join(name);
        let existed = self.is_dir(&path)?;
        if !existed {
            self.backend.create_dir_all(&path)?;
        }
        let present = self.is_dir(&path)?;
        tracing::debug!(path = %path.display(), existed, present, "ensure_dir");
        Ok(present)
    }

    /// Whether `path` holds at least `max_entries` sub-directories. Files are
    /// not counted.
    pub fn is_at_capacity(&self, path: &Path) -> Result<bool> {
        Ok(self.count_sub_dirs(path)? >= self.max_entries)
    }

    pub fn count_sub_dirs(&self, path: &Path) -> Result<usize> {
        Ok(self
            .backend
            .list_dir(path)?
            .iter()
            .filter(|e| e.kind == EntryKind::Dir)
            .count())
    }

    /// Create or replace `base/name` in one step.
    pub fn write(&self, base: &Path, name: &str, content: &[u8]) -> Result<()> {
        self.backend.write_atomic(&base.join(name), content)
    }

    pub fn read(&self, base: &Path, name: &str) -> Result<Vec<u8>> {
        self.backend.read(&base.join(name))
    }

    /// Find the directory an identity was placed in, if any.
    pub fn locate_identity(&self, root: &Path, identity: &str) -> Result<Option<PathBuf>> {
        let mut level = root.to_path_buf();
        for depth in 0..MAX_SHARD_DEPTH {
            let candidate = level.join(identity);
            if self.is_dir(&candidate)? {
                return Ok(Some(candidate));
            }
            let shard = level.join(shard_name(identity, depth));
            if !self.is_dir(&shard)? {
                return Ok(None);
            }
            level = shard;
        }
        let candidate = level.join(identity);
        Ok(self.is_dir(&candidate)?.then_some(candidate))
    }

    /// The directory an identity lives in or would be placed in, without
    /// creating anything.
    pub fn plan_identity(&self, root: &Path, identity: &str) -> Result<PathBuf> {
        if let Some(existing) = self.locate_identity(root, identity)? {
            return Ok(existing);
        }
        let mut level = root.to_path_buf();
        for depth in 0..MAX_SHARD_DEPTH {
            if !self.is_dir(&level)? || !self.is_at_capacity(&level)? {
                break;
            }
            level = level.join(shard_name(identity, depth));
        }
        Ok(level.join(identity))
    }

    /// Like [`plan_identity`](Self::plan_identity), but creates the directory.
    pub fn place_identity(&self, root: &Path, identity: &str) -> Result<PathBuf> {
        let dir = self.plan_identity(root, identity)?;
        let (base, name) = split_last(&dir)?;
        if !self.ensure_dir(base, name)? {
            return Err(MockError::Io(std::io::Error::other(format!(
                "could not create {}",
                dir.display()
            ))));
        }
        if dir.parent() != Some(root) {
            tracing::debug!(identity, dir = %dir.display(), "identity placed in overflow shard");
        }
        Ok(dir)
    }

    fn is_dir(&self, path: &Path) -> Result<bool> {
        Ok(self.backend.entry_kind(path)? == Some(EntryKind::Dir))
    }
}

/// `~` followed by byte `depth` of the identity's SHA-256 digest in hex.
pub fn shard_name(identity: &str, depth: usize) -> String {
    let digest = Sha256::digest(identity.as_bytes());
    format!("{}{:02x}", SHARD_PREFIX, digest[depth % digest.len()])
}

fn split_last(dir: &Path) -> Result<(&Path, &str)> {
    let base = dir.parent().unwrap_or_else(|| Path::new(""));
    let name = dir
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| MockError::InvalidKey(format!("bad directory {}", dir.display())))?;
    Ok((base, name))
}

use super::backend::{DirEntry, StorageBackend};
use super::fs_backend::FsBackend;
use super::layout::Layout;
use super::scan;
use crate::config::StoreConfig;
use crate::error::{MockError, Result};
use crate::model::{Lookup, LookupSource, MockEntry, MockKey, RootStatus};
use std::path::{Path, PathBuf};

/// Records and replays mocks under a single root directory.
///
/// Generic over [`StorageBackend`] so the same logic runs against the real
/// filesystem ([`FsBackend`]) and an in-memory tree in tests.
pub struct MockStore<B: StorageBackend> {
    backend: B,
    config: StoreConfig,
    root: PathBuf,
}

impl MockStore<FsBackend> {
    pub fn open(config: StoreConfig) -> Self {
        Self::with_backend(FsBackend::new(), config)
    }
}

impl<B: StorageBackend> MockStore<B> {
    pub fn with_backend(backend: B, config: StoreConfig) -> Self {
        let root = backend.absolute(&config.root_path);
        Self {
            backend,
            config,
            root,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The root directory, resolved to an absolute path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn layout(&self) -> Layout<'_, B> {
        Layout::new(&self.backend, self.config.max_entries_per_dir)
    }

    /// Store `payload` for `(service, identity)`, replacing any earlier mock
    /// for the same key. Returns the path written.
    pub fn put(&self, service: &str, identity: &str, payload: &[u8]) -> Result<PathBuf> {
        let key = MockKey::new(service, identity)?;
        let layout = self.layout();
        let dir = layout.place_identity(&self.root, &key.identity)?;
        let file_name = key.file_name(&self.config.file_suffix);

        layout.write(&dir, &file_name, payload)?;

        let path = dir.join(file_name);
        tracing::info!(key = %key, path = %path.display(), bytes = payload.len(), "recorded mock");
        Ok(path)
    }

    pub fn get(&self, service: &str, identity: &str) -> Result<Vec<u8>> {
        self.get_with_source(service, identity).map(|lookup| lookup.payload)
    }

    /// Exact lookup first, then a search of the whole root by service name.
    ///
    /// The search only runs when the exact file is plainly absent. Any other
    /// failure while probing for it is returned as is.
    pub fn get_with_source(&self, service: &str, identity: &str) -> Result<Lookup> {
        let key = MockKey::new(service, identity)?;
        let layout = self.layout();

        match layout.locate_identity(&self.root, &key.identity)? {
            Some(dir) => {
                let file_name = key.file_name(&self.config.file_suffix);
                if layout.exists(&dir, &file_name)? {
                    let payload = layout.read(&dir, &file_name)?;
                    return Ok(Lookup {
                        payload,
                        path: dir.join(file_name),
                        source: LookupSource::Exact,
                    });
                }
                tracing::debug!(key = %key, "no exact mock, searching by service");
            }
            None if self.config.fallback_on_missing_identity => {
                tracing::debug!(key = %key, "identity has no directory, searching by service");
            }
            None => {
                return Err(MockError::NotFound(format!(
                    "no mocks recorded for identity '{}'",
                    key.identity
                )));
            }
        }

        self.fallback(&key)
    }

    fn fallback(&self, key: &MockKey) -> Result<Lookup> {
        let matches = scan::search(&self.backend, &self.root, &key.service)?;
        let first = matches.into_iter().next().ok_or_else(|| {
            MockError::NotFound(format!("no mock recorded for service '{}'", key.service))
        })?;

        let payload = self.backend.read(&first)?;
        tracing::info!(key = %key, path = %first.display(), "served fallback mock");
        Ok(Lookup {
            payload,
            path: first,
            source: LookupSource::Fallback,
        })
    }

    /// Files anywhere under the root whose name contains `needle`.
    pub fn search(&self, needle: &str) -> Result<Vec<PathBuf>> {
        scan::search(&self.backend, &self.root, needle)
    }

    /// Path of the exact mock for a key, if one is stored.
    pub fn locate(&self, service: &str, identity: &str) -> Result<Option<PathBuf>> {
        let key = MockKey::new(service, identity)?;
        let layout = self.layout();
        let Some(dir) = layout.locate_identity(&self.root, &key.identity)? else {
            return Ok(None);
        };
        let file_name = key.file_name(&self.config.file_suffix);
        Ok(layout.exists(&dir, &file_name)?.then(|| dir.join(file_name)))
    }

    /// Where `put` would write a key, without touching the tree.
    pub fn path_for(&self, service: &str, identity: &str) -> Result<PathBuf> {
        let key = MockKey::new(service, identity)?;
        let dir = self.layout().plan_identity(&self.root, &key.identity)?;
        Ok(dir.join(key.file_name(&self.config.file_suffix)))
    }

    /// Every stored mock following the naming scheme, in scan order.
    pub fn list(&self) -> Result<Vec<MockEntry>> {
        let suffix = self.config.file_suffix.as_str();
        let mut found = Vec::new();

        let walked = scan::walk(&self.backend, &self.root, &mut |dir: &Path, entry: &DirEntry| {
            let identity = dir.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            if let Some(key) = MockKey::from_file_name(&entry.name, identity, suffix) {
                found.push((key, entry.path.clone()));
            }
        });
        match walked {
            Ok(()) => {}
            Err(MockError::NotFound(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        }

        found
            .into_iter()
            .map(|(key, path)| {
                let meta = self.backend.metadata(&path)?;
                Ok(MockEntry {
                    key,
                    path,
                    size: meta.size,
                    modified: meta.modified,
                })
            })
            .collect()
    }

    pub fn status(&self) -> Result<RootStatus> {
        let layout = self.layout();
        let sub_dirs = if self.backend.entry_kind(&self.root)?.is_some() {
            layout.count_sub_dirs(&self.root)?
        } else {
            0
        };
        Ok(RootStatus {
            root: self.root.clone(),
            sub_dirs,
            max_entries: self.config.max_entries_per_dir,
            at_capacity: sub_dirs >= self.config.max_entries_per_dir,
        })
    }
}

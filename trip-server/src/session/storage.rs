//! Key/value persistence backends for session snapshots.
//!
//! The engine only needs what a browser's session storage offers: read,
//! write and remove a string under a key. The engine is the only writer.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Errors from a persistence backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Filesystem operation failed
    #[error("failed to {action} {key}: {source}")]
    Io {
        action: &'static str,
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Key cannot be mapped onto the backend
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// A string key/value store.
pub trait SnapshotStorage {
    /// Read the value under `key`, if any.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: SnapshotStorage + ?Sized> SnapshotStorage for Arc<S> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// In-memory storage. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
    prefix: String,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A view of the same entries with keys namespaced under `scope`.
    pub fn scoped(&self, scope: &str) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            prefix: format!("{}{}/", self.prefix, scope),
        }
    }

    /// Number of entries across all scopes.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A panicking writer cannot leave a half-written String behind
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

impl SnapshotStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(&self.full_key(key)).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock().insert(self.full_key(key), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(&self.full_key(key));
        Ok(())
    }
}

/// Storage backed by one JSON file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `root`. The directory is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// A storage rooted at a subdirectory named `scope`.
    pub fn scoped(&self, scope: &str) -> Result<Self, StorageError> {
        validate_key(scope)?;
        Ok(Self {
            root: self.root.join(scope),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.json")))
    }
}

/// Keys become file names, so only a conservative character set is allowed.
fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key.len() <= 128
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

impl SnapshotStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io {
                action: "read",
                key: key.to_string(),
                source: e,
            }),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| StorageError::Io {
                action: "create directory for",
                key: key.to_string(),
                source: e,
            })?;
        }

        // Write then rename so a reader never sees a torn file
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)
            .and_then(|()| std::fs::rename(&tmp, &path))
            .map_err(|e| StorageError::Io {
                action: "write",
                key: key.to_string(),
                source: e,
            })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io {
                action: "remove",
                key: key.to_string(),
                source: e,
            }),
        }
    }
}

//! File-backed key/value storage standing in for browser local storage.
//!
//! The whole store is one JSON object of string keys to string values. Every
//! write replaces the file (temp file + rename) before returning, so a value
//! set by one process is visible to the next one that opens the store.
//!
//! There is no locking between processes: two writers race and the last
//! rename wins.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;
use tracing::{debug, warn};

/// Storage keys.
pub mod keys {
    /// Tabular API key entered in the BackOffice settings.
    pub const API_KEY: &str = "folio.airtable_api_key";

    /// Base identifier entered in the BackOffice settings.
    pub const BASE_ID: &str = "folio.airtable_base_id";

    /// Serialized BackOffice session.
    pub const SESSION: &str = "folio.session";
}

/// Errors that can occur while reading or writing local storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("storage I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The storage file is not a JSON object of strings.
    #[error("storage file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Local key/value store.
///
/// Cheaply cloneable; clones share the same values and file.
#[derive(Clone)]
pub struct LocalStore {
    inner: Arc<LocalStoreInner>,
}

struct LocalStoreInner {
    path: Option<PathBuf>,
    values: RwLock<BTreeMap<String, String>>,
}

impl LocalStore {
    /// Open the store backed by `path`.
    ///
    /// A missing file is an empty store; the file and its parent directory are
    /// created on the first write.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the file exists but cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StorageError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };

        debug!(path = %path.display(), keys = values.len(), "Opened local storage");

        Ok(Self {
            inner: Arc::new(LocalStoreInner {
                path: Some(path),
                values: RwLock::new(values),
            }),
        })
    }

    /// A store that lives only in memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(LocalStoreInner {
                path: None,
                values: RwLock::new(BTreeMap::new()),
            }),
        }
    }

    /// Backing file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.inner.path.as_deref()
    }

    /// Read a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.inner
            .values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Set a value and persist the store.
    ///
    /// The in-memory value is only updated once the file write succeeded.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the file cannot be written.
    pub fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self
            .inner
            .values
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let mut next = values.clone();
        next.insert(key.to_owned(), value.to_owned());
        self.persist(&next)?;
        *values = next;
        Ok(())
    }

    /// Remove a value and persist the store.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the file cannot be written.
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut values = self
            .inner
            .values
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if !values.contains_key(key) {
            return Ok(());
        }

        let mut next = values.clone();
        next.remove(key);
        self.persist(&next)?;
        *values = next;
        Ok(())
    }

    /// Remove several values with a single write.
    ///
    /// Either every key is removed or, if the write fails, none is.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the file cannot be written.
    pub fn remove_all(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut values = self
            .inner
            .values
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if !keys.iter().any(|key| values.contains_key(*key)) {
            return Ok(());
        }

        let mut next = values.clone();
        for key in keys {
            next.remove(*key);
        }
        self.persist(&next)?;
        *values = next;
        Ok(())
    }

    /// Rewrite the backing file from the in-memory values.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the file cannot be written.
    pub fn flush(&self) -> Result<(), StorageError> {
        let values = self
            .inner
            .values
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        self.persist(&values)
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let Some(path) = self.inner.path.as_deref() else {
            return Ok(());
        };
        let io_err = |source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let bytes = serde_json::to_vec_pretty(values).map_err(|e| io_err(e.into()))?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes).map_err(io_err)?;
        if let Err(e) = std::fs::rename(&tmp, path) {
            warn!(path = %path.display(), error = %e, "Failed to replace local storage file");
            let _ = std::fs::remove_file(&tmp);
            return Err(io_err(e));
        }
        Ok(())
    }
}

impl std::fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStore")
            .field("path", &self.inner.path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_roundtrip() {
        let store = LocalStore::in_memory();
        assert!(store.get("k").is_none());

        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));

        store.remove("k").unwrap();
        assert!(store.get("k").is_none());
        assert!(store.path().is_none());
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("local-storage.json");

        let store = LocalStore::open(&path).unwrap();
        store.set(keys::BASE_ID, "appXYZ").unwrap();
        assert!(path.exists());

        let reopened = LocalStore::open(&path).unwrap();
        assert_eq!(reopened.get(keys::BASE_ID).as_deref(), Some("appXYZ"));
    }

    #[test]
    fn test_remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local-storage.json");

        let store = LocalStore::open(&path).unwrap();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.remove("a").unwrap();

        let reopened = LocalStore::open(&path).unwrap();
        assert!(reopened.get("a").is_none());
        assert_eq!(reopened.get("b").as_deref(), Some("2"));
    }

    #[test]
    fn test_remove_all() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local-storage.json");

        let store = LocalStore::open(&path).unwrap();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.set("c", "3").unwrap();
        store.remove_all(&["a", "b", "missing"]).unwrap();

        let reopened = LocalStore::open(&path).unwrap();
        assert!(reopened.get("a").is_none());
        assert!(reopened.get("b").is_none());
        assert_eq!(reopened.get("c").as_deref(), Some("3"));
    }

    #[test]
    fn test_failed_remove_all_keeps_every_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local-storage.json");

        let store = LocalStore::open(&path).unwrap();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();

        // The temp file cannot be written while a directory occupies its path
        std::fs::create_dir(path.with_extension("json.tmp")).unwrap();

        let err = store.remove_all(&["a", "b"]).unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
        assert_eq!(store.get("a").as_deref(), Some("1"));
        assert_eq!(store.get("b").as_deref(), Some("2"));

        let reopened = LocalStore::open(&path).unwrap();
        assert_eq!(reopened.get("a").as_deref(), Some("1"));
        assert_eq!(reopened.get("b").as_deref(), Some("2"));
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local-storage.json");
        std::fs::write(&path, "not json").unwrap();

        let err = LocalStore::open(&path).unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }

    #[test]
    fn test_clones_share_values() {
        let store = LocalStore::in_memory();
        let clone = store.clone();
        store.set("shared", "yes").unwrap();
        assert_eq!(clone.get("shared").as_deref(), Some("yes"));
    }
}

//! Connection credentials for the tabular API.
//!
//! The API key and base id are entered in the BackOffice settings. Each setter
//! persists to local storage first and then updates the in-memory copy that
//! the transport reads on every request.

use std::sync::{Arc, PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use crate::storage::{LocalStore, StorageError, keys};

/// Current credential values.
#[derive(Clone, Default)]
struct Credentials {
    api_key: Option<SecretString>,
    base_id: Option<String>,
}

/// Process-wide credential store backed by [`LocalStore`].
///
/// Cheaply cloneable; the transport and the settings UI share one instance.
#[derive(Clone)]
pub struct CredentialStore {
    inner: Arc<CredentialStoreInner>,
}

struct CredentialStoreInner {
    storage: LocalStore,
    values: RwLock<Credentials>,
}

impl CredentialStore {
    /// Load credentials previously saved in `storage`.
    #[must_use]
    pub fn load(storage: LocalStore) -> Self {
        let values = Credentials {
            api_key: storage.get(keys::API_KEY).map(SecretString::from),
            base_id: storage.get(keys::BASE_ID),
        };

        Self {
            inner: Arc::new(CredentialStoreInner {
                storage,
                values: RwLock::new(values),
            }),
        }
    }

    /// Save a new API key. No format validation is applied.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the key cannot be persisted; the previous key
    /// stays in effect.
    pub fn set_api_key(&self, key: &str) -> Result<(), StorageError> {
        self.inner.storage.set(keys::API_KEY, key)?;
        self.write().api_key = Some(SecretString::from(key.to_owned()));
        info!("API key updated");
        Ok(())
    }

    /// Save a new base identifier.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the id cannot be persisted.
    pub fn set_base_id(&self, base_id: &str) -> Result<(), StorageError> {
        self.inner.storage.set(keys::BASE_ID, base_id)?;
        self.write().base_id = Some(base_id.to_owned());
        info!(base_id, "Base id updated");
        Ok(())
    }

    /// Forget both values.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if local storage cannot be updated; both values
    /// then stay in effect.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.inner
            .storage
            .remove_all(&[keys::API_KEY, keys::BASE_ID])?;
        *self.write() = Credentials::default();
        Ok(())
    }

    /// The API key, if one has been set and is non-empty.
    #[must_use]
    pub fn api_key(&self) -> Option<SecretString> {
        self.read()
            .api_key
            .as_ref()
            .filter(|key| !key.expose_secret().is_empty())
            .cloned()
    }

    /// The base identifier, if one has been set and is non-empty.
    #[must_use]
    pub fn base_id(&self) -> Option<String> {
        self.read()
            .base_id
            .as_ref()
            .filter(|id| !id.trim().is_empty())
            .cloned()
    }

    /// Whether both an API key and a base id are available.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key().is_some() && self.base_id().is_some()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Credentials> {
        self.inner
            .values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Credentials> {
        self.inner
            .values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values = self.read();
        f.debug_struct("CredentialStore")
            .field("api_key", &values.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_id", &values.base_id)
            .finish()
    }
}

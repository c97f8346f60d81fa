//! BackOffice session.
//!
//! Two states: anonymous (initial) and authenticated. Login compares the
//! submitted pair against the demo credentials shown on the login form; there
//! is no hashing, lockout, expiry or server-side verification. This gate only
//! keeps casual visitors out of the editing screens and must not be mistaken
//! for access control.
//!
//! The session is persisted in local storage under [`keys::SESSION`] as
//! `{"user": {"email": ...} | null, "isAuthenticated": bool}` and restored on
//! startup.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::storage::{LocalStore, StorageError, keys};

/// Email of the demo BackOffice account.
pub const DEMO_EMAIL: &str = "admin@example.com";

/// Password of the demo BackOffice account.
pub const DEMO_PASSWORD: &str = "password123";

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email or password did not match.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The operation requires a logged-in user.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The session could not be persisted.
    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Session-stored user identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub email: String,
}

/// Persisted session document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub user: Option<SessionUser>,
    #[serde(default)]
    pub is_authenticated: bool,
}

impl Session {
    fn authenticated(email: &str) -> Self {
        Self {
            user: Some(SessionUser {
                email: email.to_owned(),
            }),
            is_authenticated: true,
        }
    }

    /// A flag without a user (or a user without the flag) is not a session.
    fn normalized(self) -> Self {
        if self.is_authenticated && self.user.is_some() {
            self
        } else {
            Self::default()
        }
    }
}

/// BackOffice session store.
///
/// Cheaply cloneable; clones share state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

struct SessionStoreInner {
    storage: LocalStore,
    state: RwLock<Session>,
}

impl SessionStore {
    /// Restore the session saved in `storage`.
    ///
    /// A missing or unreadable document starts anonymous.
    #[must_use]
    pub fn load(storage: LocalStore) -> Self {
        let state = storage
            .get(keys::SESSION)
            .and_then(|raw| {
                serde_json::from_str::<Session>(&raw)
                    .inspect_err(|e| warn!(error = %e, "Discarding unreadable session"))
                    .ok()
            })
            .map(Session::normalized)
            .unwrap_or_default();

        Self {
            inner: Arc::new(SessionStoreInner {
                storage,
                state: RwLock::new(state),
            }),
        }
    }

    /// Log in with the demo credentials.
    ///
    /// Both fields must match exactly (case-sensitive). On failure the current
    /// state is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on mismatch, or
    /// `AuthError::Storage` if the session cannot be persisted.
    pub fn login(&self, email: &str, password: &str) -> Result<SessionUser, AuthError> {
        if email != DEMO_EMAIL || password != DEMO_PASSWORD {
            warn!(email, "Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let session = Session::authenticated(email);
        self.persist(&session)?;
        let user = session.user.clone().ok_or(AuthError::NotAuthenticated)?;
        *self.write() = session;

        info!(email, "Logged in");
        Ok(user)
    }

    /// Log out and forget the user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the session cannot be persisted.
    pub fn logout(&self) -> Result<(), AuthError> {
        let session = Session::default();
        self.persist(&session)?;
        *self.write() = session;
        info!("Logged out");
        Ok(())
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn session(&self) -> Session {
        self.read().clone()
    }

    /// Whether a user is logged in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated
    }

    /// The logged-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<SessionUser> {
        self.read().user.clone()
    }

    /// The logged-in user, or an error for anonymous sessions.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` when nobody is logged in.
    pub fn require_authenticated(&self) -> Result<SessionUser, AuthError> {
        let state = self.read();
        match (&state.user, state.is_authenticated) {
            (Some(user), true) => Ok(user.clone()),
            _ => Err(AuthError::NotAuthenticated),
        }
    }

    fn persist(&self, session: &Session) -> Result<(), AuthError> {
        let raw = serde_json::to_string(session).map_err(|e| {
            AuthError::Storage(StorageError::Io {
                path: self.inner.storage.path().map(ToOwned::to_owned).unwrap_or_default(),
                source: e.into(),
            })
        })?;
        self.inner.storage.set(keys::SESSION, &raw)?;
        Ok(())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Session> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Session> {
        self.inner.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &*self.read())
            .finish_non_exhaustive()
    }
}

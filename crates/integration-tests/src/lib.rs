//! Integration tests for Folio.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p folio-integration-tests
//! ```
//!
//! No network access is needed: every test runs the real services, session
//! and local storage over the in-memory transport.
//!
//! # Test Categories
//!
//! - `content_services` - Save/fetch/delete through the typed services
//! - `backoffice_session` - Login, logout and persistence of the session
//! - `site_content` - Placeholders and cache invalidation
//! - `transport` - Credential gating of the HTTP transport

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use folio_backoffice::airtable::{Fields, MemoryTransport, TableTransport};
use folio_backoffice::storage::LocalStore;
use folio_backoffice::{Backoffice, BackofficeConfig};

/// A context over a fresh in-memory transport.
pub struct TestContext {
    pub transport: Arc<MemoryTransport>,
    pub storage: LocalStore,
    pub backoffice: Backoffice,
}

impl TestContext {
    /// Context with in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::with_storage(LocalStore::in_memory())
    }

    /// Context over an existing storage, e.g. one reopened from disk.
    #[must_use]
    pub fn with_storage(storage: LocalStore) -> Self {
        let transport = Arc::new(MemoryTransport::new());
        let backoffice = Backoffice::with_transport(
            BackofficeConfig::default(),
            storage.clone(),
            Arc::clone(&transport) as Arc<dyn TableTransport>,
        );
        Self {
            transport,
            storage,
            backoffice,
        }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a field bag from a JSON object literal.
///
/// # Panics
///
/// Panics if `value` is not a JSON object.
#[must_use]
#[allow(clippy::expect_used)]
pub fn fields(value: serde_json::Value) -> Fields {
    value
        .as_object()
        .cloned()
        .expect("fields must be a JSON object")
}

//! BackOffice context shared by every caller.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::airtable::{AirtableClient, TableTransport, TransportError};
use crate::config::BackofficeConfig;
use crate::content::SiteContentLoader;
use crate::credentials::CredentialStore;
use crate::services::{
    CareerService, ChangeHook, ContactService, HeroService, PortfolioService, SkillService,
};
use crate::session::{AuthError, SessionStore, SessionUser};
use crate::storage::{LocalStore, StorageError};

/// Errors opening or closing the context.
#[derive(Debug, Error)]
pub enum BackofficeError {
    #[error("local storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("transport setup error: {0}")]
    Transport(#[from] TransportError),
}

/// Everything the site and the BackOffice need, wired together.
///
/// This struct is cheaply cloneable via `Arc`. Writes made through
/// [`hero`](Self::hero), [`portfolio`](Self::portfolio) and the other editor
/// services invalidate the cached [`site`](Self::site) content.
#[derive(Clone)]
pub struct Backoffice {
    inner: Arc<BackofficeInner>,
}

struct BackofficeInner {
    config: BackofficeConfig,
    storage: LocalStore,
    credentials: CredentialStore,
    session: SessionStore,
    hero: HeroService,
    contact: ContactService,
    portfolio: PortfolioService,
    career: CareerService,
    skills: SkillService,
    site: SiteContentLoader,
}

impl Backoffice {
    /// Open the context backed by the local storage file under
    /// `config.data_dir` and the HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns `BackofficeError` if local storage cannot be read or the HTTP
    /// client cannot be built.
    pub fn open(config: BackofficeConfig) -> Result<Self, BackofficeError> {
        let storage = LocalStore::open(config.local_storage_path())?;
        let credentials = CredentialStore::load(storage.clone());
        let client = AirtableClient::new(&config, credentials.clone())?;

        info!(
            data_dir = %config.data_dir.display(),
            api_base = %config.api_base_url,
            "BackOffice context opened"
        );

        Ok(Self::assemble(config, storage, credentials, Arc::new(client)))
    }

    /// Build the context over an explicit storage and transport.
    ///
    /// The credential store is loaded from `storage` but not handed to
    /// `transport`.
    #[must_use]
    pub fn with_transport(
        config: BackofficeConfig,
        storage: LocalStore,
        transport: Arc<dyn TableTransport>,
    ) -> Self {
        let credentials = CredentialStore::load(storage.clone());
        Self::assemble(config, storage, credentials, transport)
    }

    fn assemble(
        config: BackofficeConfig,
        storage: LocalStore,
        credentials: CredentialStore,
        transport: Arc<dyn TableTransport>,
    ) -> Self {
        let session = SessionStore::load(storage.clone());

        let site = SiteContentLoader::new(
            HeroService::new(Arc::clone(&transport)),
            ContactService::new(Arc::clone(&transport)),
            PortfolioService::new(Arc::clone(&transport)),
            CareerService::new(Arc::clone(&transport)),
            SkillService::new(Arc::clone(&transport)),
            config.cache_ttl,
        );

        let invalidate: ChangeHook = {
            let site = site.clone();
            Arc::new(move || site.invalidate())
        };

        Self {
            inner: Arc::new(BackofficeInner {
                hero: HeroService::new(Arc::clone(&transport))
                    .with_change_hook(Arc::clone(&invalidate)),
                contact: ContactService::new(Arc::clone(&transport))
                    .with_change_hook(Arc::clone(&invalidate)),
                portfolio: PortfolioService::new(Arc::clone(&transport))
                    .with_change_hook(Arc::clone(&invalidate)),
                career: CareerService::new(Arc::clone(&transport))
                    .with_change_hook(Arc::clone(&invalidate)),
                skills: SkillService::new(transport).with_change_hook(invalidate),
                config,
                storage,
                credentials,
                session,
                site,
            }),
        }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &BackofficeConfig {
        &self.inner.config
    }

    /// Get a reference to the API credentials entered in the settings.
    #[must_use]
    pub fn credentials(&self) -> &CredentialStore {
        &self.inner.credentials
    }

    /// Get a reference to the BackOffice session.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Shorthand for [`SessionStore::require_authenticated`].
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` when nobody is logged in.
    pub fn require_authenticated(&self) -> Result<SessionUser, AuthError> {
        self.inner.session.require_authenticated()
    }

    #[must_use]
    pub fn hero(&self) -> &HeroService {
        &self.inner.hero
    }

    #[must_use]
    pub fn contact(&self) -> &ContactService {
        &self.inner.contact
    }

    #[must_use]
    pub fn portfolio(&self) -> &PortfolioService {
        &self.inner.portfolio
    }

    #[must_use]
    pub fn career(&self) -> &CareerService {
        &self.inner.career
    }

    #[must_use]
    pub fn skills(&self) -> &SkillService {
        &self.inner.skills
    }

    /// Get a reference to the cached public site content.
    #[must_use]
    pub fn site(&self) -> &SiteContentLoader {
        &self.inner.site
    }

    /// Flush local storage and release the context.
    ///
    /// # Errors
    ///
    /// Returns `BackofficeError::Storage` if the final flush fails.
    pub fn close(self) -> Result<(), BackofficeError> {
        self.inner.storage.flush()?;
        info!("BackOffice context closed");
        Ok(())
    }
}

impl std::fmt::Debug for Backoffice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backoffice")
            .field("config", &self.inner.config)
            .field("credentials", &self.inner.credentials)
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use folio_core::HeroData;

    use super::*;
    use crate::airtable::MemoryTransport;

    #[tokio::test]
    async fn test_editor_write_invalidates_site_cache() {
        let transport = Arc::new(MemoryTransport::new());
        let backoffice = Backoffice::with_transport(
            BackofficeConfig::default(),
            LocalStore::in_memory(),
            Arc::clone(&transport) as Arc<dyn TableTransport>,
        );

        let before = backoffice.site().load().await;
        assert_eq!(before.hero, crate::content::placeholder_hero());

        backoffice
            .hero()
            .save(&HeroData::new("Jane Doe", "Systems engineer"))
            .await
            .unwrap();

        let after = backoffice.site().load().await;
        assert_eq!(after.hero.title, "Jane Doe");
        assert!(after.placeholders.iter().all(|s| *s != crate::content::Section::Hero));
    }

    #[test]
    fn test_open_and_close_with_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = BackofficeConfig::with_data_dir(dir.path());

        let backoffice = Backoffice::open(config.clone()).unwrap();
        backoffice.credentials().set_base_id("appXYZ").unwrap();
        backoffice.close().unwrap();

        let reopened = Backoffice::open(config).unwrap();
        assert_eq!(reopened.credentials().base_id().as_deref(), Some("appXYZ"));
    }
}

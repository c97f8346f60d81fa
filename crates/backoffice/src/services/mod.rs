//! Typed record services.
//!
//! One service per content type, each bound to a fixed table:
//!
//! | Service              | Table       | Shape      |
//! |----------------------|-------------|------------|
//! | [`HeroService`]      | `Hero`      | singleton  |
//! | [`ContactService`]   | `Contact`   | singleton  |
//! | [`PortfolioService`] | `Portfolio` | collection |
//! | [`CareerService`]    | `Career`    | collection |
//! | [`SkillService`]     | `Skills`    | collection |
//!
//! The primary methods return `Result` so callers can tell "no records" from
//! "fetch failed". The `*_or_empty` / `*_or_none` / `*_or_false` variants log
//! the error and return a benign value instead, for call sites (like the public
//! pages) that only ever fall back to placeholder content.

mod conversions;

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, instrument};

use folio_core::{CareerItem, ContactInfo, HeroData, PortfolioItem, RecordId, SkillItem};

use crate::airtable::{Fields, Record, TableTransport, TransportError};

/// Singleton service for the hero banner.
pub type HeroService = SingletonService<HeroData>;
/// Singleton service for contact details.
pub type ContactService = SingletonService<ContactInfo>;
/// Collection service for portfolio projects.
pub type PortfolioService = CollectionService<PortfolioItem>;
/// Collection service for career timeline entries.
pub type CareerService = CollectionService<CareerItem>;
/// Collection service for skills.
pub type SkillService = CollectionService<SkillItem>;

/// Callback run after every successful write.
pub type ChangeHook = Arc<dyn Fn() + Send + Sync>;

/// Errors returned by the record services.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The transport call failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The operation needs a saved item but the item has no id.
    #[error("{table} item has not been saved yet")]
    MissingId { table: &'static str },
}

/// Mapping between a content type and the field bag of its table.
pub trait TableRecord: Sized + Send + Sync {
    /// Remote table name.
    const TABLE: &'static str;

    /// Id of a saved item, `None` for a new one.
    fn id(&self) -> Option<&RecordId>;

    /// Build the item from a record. Missing fields default, never fail.
    fn from_record(record: Record) -> Self;

    /// Field bag for create/update. Absent optional values are `null`.
    fn to_fields(&self) -> Fields;
}

/// Failure of [`CollectionService::save_all`].
///
/// Items before `failed_index` stay committed remotely.
pub struct BulkSaveError<R> {
    /// Items saved before the failure, as returned by the store.
    pub committed: Vec<R>,
    /// Index of the item that failed.
    pub failed_index: usize,
    /// Why it failed.
    pub error: ContentError,
}

impl<R> fmt::Debug for BulkSaveError<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BulkSaveError")
            .field("committed", &self.committed.len())
            .field("failed_index", &self.failed_index)
            .field("error", &self.error)
            .finish()
    }
}

impl<R> fmt::Display for BulkSaveError<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bulk save failed at item {} ({} committed): {}",
            self.failed_index,
            self.committed.len(),
            self.error
        )
    }
}

impl<R> std::error::Error for BulkSaveError<R> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

// =============================================================================
// Shared table access
// =============================================================================

struct Table<R> {
    transport: Arc<dyn TableTransport>,
    on_change: Option<ChangeHook>,
    record: PhantomData<fn() -> R>,
}

impl<R> Clone for Table<R> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            on_change: self.on_change.clone(),
            record: PhantomData,
        }
    }
}

impl<R: TableRecord> Table<R> {
    fn new(transport: Arc<dyn TableTransport>) -> Self {
        Self {
            transport,
            on_change: None,
            record: PhantomData,
        }
    }

    async fn list(&self) -> Result<Vec<R>, ContentError> {
        let records = self.transport.list(R::TABLE).await?;
        Ok(records.into_iter().map(R::from_record).collect())
    }

    async fn save(&self, item: &R) -> Result<R, ContentError> {
        let fields = item.to_fields();
        let record = match item.id() {
            Some(id) => self.transport.update(R::TABLE, id, fields).await?,
            None => {
                let fields = fields.into_iter().filter(|(_, v)| !v.is_null()).collect();
                self.transport.create(R::TABLE, fields).await?
            }
        };
        self.changed();
        Ok(R::from_record(record))
    }

    async fn delete(&self, id: &RecordId) -> Result<bool, ContentError> {
        let deleted = self.transport.delete(R::TABLE, id).await?;
        self.changed();
        Ok(deleted.deleted)
    }

    fn changed(&self) {
        if let Some(hook) = &self.on_change {
            hook();
        }
    }
}

// =============================================================================
// CollectionService
// =============================================================================

/// Service for a table holding many items.
pub struct CollectionService<R> {
    table: Table<R>,
}

impl<R> Clone for CollectionService<R> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
        }
    }
}

impl<R: TableRecord> CollectionService<R> {
    /// Create a service over `transport`.
    #[must_use]
    pub fn new(transport: Arc<dyn TableTransport>) -> Self {
        Self {
            table: Table::new(transport),
        }
    }

    /// Run `hook` after every successful save or delete.
    #[must_use]
    pub fn with_change_hook(mut self, hook: ChangeHook) -> Self {
        self.table.on_change = Some(hook);
        self
    }

    /// Fetch every item (first page of the table).
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Transport` if the listing fails.
    #[instrument(skip(self), fields(table = R::TABLE))]
    pub async fn get_all(&self) -> Result<Vec<R>, ContentError> {
        self.table.list().await
    }

    /// Fetch one item by id.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Transport` if the listing fails.
    #[instrument(skip(self), fields(table = R::TABLE, id = %id))]
    pub async fn get(&self, id: &RecordId) -> Result<Option<R>, ContentError> {
        let items = self.table.list().await?;
        Ok(items.into_iter().find(|item| item.id() == Some(id)))
    }

    /// Update the item if it has an id, create it otherwise.
    ///
    /// Returns the item as stored, with its id.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Transport` if the write fails.
    #[instrument(skip(self, item), fields(table = R::TABLE))]
    pub async fn save(&self, item: &R) -> Result<R, ContentError> {
        let saved = self.table.save(item).await?;
        info!(id = ?saved.id().map(RecordId::as_str), "Item saved");
        Ok(saved)
    }

    /// Delete an item by id. Returns whether the store confirmed the deletion.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Transport` if the delete fails.
    #[instrument(skip(self), fields(table = R::TABLE, id = %id))]
    pub async fn delete(&self, id: &RecordId) -> Result<bool, ContentError> {
        self.table.delete(id).await
    }

    /// Delete a saved item.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::MissingId` for an unsaved item, otherwise as
    /// [`delete`](Self::delete).
    pub async fn delete_item(&self, item: &R) -> Result<bool, ContentError> {
        let id = item
            .id()
            .ok_or(ContentError::MissingId { table: R::TABLE })?;
        self.delete(id).await
    }

    /// Save items one at a time, in order, awaiting each before the next.
    ///
    /// Stops at the first failure. Nothing is rolled back.
    ///
    /// # Errors
    ///
    /// Returns `BulkSaveError` with the items committed before the failure.
    #[instrument(skip(self, items), fields(table = R::TABLE, count = items.len()))]
    pub async fn save_all(&self, items: &[R]) -> Result<Vec<R>, BulkSaveError<R>> {
        let mut committed = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match self.table.save(item).await {
                Ok(saved) => committed.push(saved),
                Err(error) => {
                    error!(
                        index,
                        committed = committed.len(),
                        error = %error,
                        "Bulk save stopped"
                    );
                    return Err(BulkSaveError {
                        committed,
                        failed_index: index,
                        error,
                    });
                }
            }
        }
        Ok(committed)
    }

    /// [`get_all`](Self::get_all), logging failures and returning no items.
    pub async fn get_all_or_empty(&self) -> Vec<R> {
        self.get_all().await.unwrap_or_else(|e| {
            error!(table = R::TABLE, error = %e, "Failed to fetch items");
            Vec::new()
        })
    }

    /// [`save`](Self::save), logging failures and returning `None`.
    pub async fn save_or_none(&self, item: &R) -> Option<R> {
        self.save(item)
            .await
            .inspect_err(|e| error!(table = R::TABLE, error = %e, "Failed to save item"))
            .ok()
    }

    /// [`delete`](Self::delete), logging failures and returning `false`.
    pub async fn delete_or_false(&self, id: &RecordId) -> bool {
        self.delete(id).await.unwrap_or_else(|e| {
            error!(table = R::TABLE, id = %id, error = %e, "Failed to delete item");
            false
        })
    }
}

// =============================================================================
// SingletonService
// =============================================================================

/// Service for a table where only the first record is used.
///
/// Any further records are invisible to the site.
pub struct SingletonService<R> {
    table: Table<R>,
}

impl<R> Clone for SingletonService<R> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
        }
    }
}

impl<R: TableRecord> SingletonService<R> {
    /// Create a service over `transport`.
    #[must_use]
    pub fn new(transport: Arc<dyn TableTransport>) -> Self {
        Self {
            table: Table::new(transport),
        }
    }

    /// Run `hook` after every successful save or delete.
    #[must_use]
    pub fn with_change_hook(mut self, hook: ChangeHook) -> Self {
        self.table.on_change = Some(hook);
        self
    }

    /// Fetch the first record of the table, if any.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Transport` if the listing fails.
    #[instrument(skip(self), fields(table = R::TABLE))]
    pub async fn get(&self) -> Result<Option<R>, ContentError> {
        Ok(self.table.list().await?.into_iter().next())
    }

    /// Update the record if the value has an id, create it otherwise.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Transport` if the write fails.
    #[instrument(skip(self, item), fields(table = R::TABLE))]
    pub async fn save(&self, item: &R) -> Result<R, ContentError> {
        let saved = self.table.save(item).await?;
        info!(id = ?saved.id().map(RecordId::as_str), "Singleton saved");
        Ok(saved)
    }

    /// Delete the record with `id`.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Transport` if the delete fails.
    #[instrument(skip(self), fields(table = R::TABLE, id = %id))]
    pub async fn delete(&self, id: &RecordId) -> Result<bool, ContentError> {
        self.table.delete(id).await
    }

    /// [`get`](Self::get), logging failures and returning `None`.
    pub async fn get_or_none(&self) -> Option<R> {
        self.get().await.unwrap_or_else(|e| {
            error!(table = R::TABLE, error = %e, "Failed to fetch singleton");
            None
        })
    }

    /// [`save`](Self::save), logging failures and returning `None`.
    pub async fn save_or_none(&self, item: &R) -> Option<R> {
        self.save(item)
            .await
            .inspect_err(|e| error!(table = R::TABLE, error = %e, "Failed to save singleton"))
            .ok()
    }

    /// [`delete`](Self::delete), logging failures and returning `false`.
    pub async fn delete_or_false(&self, id: &RecordId) -> bool {
        self.delete(id).await.unwrap_or_else(|e| {
            error!(table = R::TABLE, id = %id, error = %e, "Failed to delete singleton");
            false
        })
    }
}

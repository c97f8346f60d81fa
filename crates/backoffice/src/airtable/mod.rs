//! Airtable-style tabular API transport.
//!
//! This module provides:
//! - [`TableTransport`], the list/create/update/delete seam the record
//!   services are written against
//! - [`AirtableClient`], the HTTP implementation
//! - [`MemoryTransport`], an in-process table store for tests and offline use
//!
//! # API Reference
//!
//! - Endpoint: `{api_base}/{baseId}/{tableName}` (`/{recordId}` for update and delete)
//! - Authentication: `Authorization: Bearer <api key>`
//! - Bodies: `{"fields": {...}}`; updates use `PATCH` so omitted fields are kept
//!
//! Only the first page of a listing is ever read. There is no retry and no
//! rate-limit backoff.

mod client;
mod error;
mod memory;
mod types;

pub use client::AirtableClient;
pub use error::TransportError;
pub use memory::MemoryTransport;
pub use types::{DeletedRecord, ErrorDetail, ErrorEnvelope, Fields, FieldsBody, ListResponse, Record};

use async_trait::async_trait;

use folio_core::RecordId;

/// Table-oriented CRUD operations against the remote store.
#[async_trait]
pub trait TableTransport: Send + Sync {
    /// List the records of `table` (first page only).
    async fn list(&self, table: &str) -> Result<Vec<Record>, TransportError>;

    /// Create a record and return it with its assigned id.
    async fn create(&self, table: &str, fields: Fields) -> Result<Record, TransportError>;

    /// Overwrite the given fields of an existing record.
    async fn update(
        &self,
        table: &str,
        id: &RecordId,
        fields: Fields,
    ) -> Result<Record, TransportError>;

    /// Delete a record.
    async fn delete(&self, table: &str, id: &RecordId) -> Result<DeletedRecord, TransportError>;
}

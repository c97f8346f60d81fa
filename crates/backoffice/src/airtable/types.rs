//! Airtable REST payload types.
//!
//! Records are `{ id, createdTime, fields }`; `fields` is a free-form bag
//! whose keys are the column names of the table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use folio_core::RecordId;

/// Field bag of a record.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// One row of a remote table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,
    #[serde(default)]
    pub created_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fields: Fields,
}

/// Response of `GET /{baseId}/{table}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub records: Vec<Record>,
    /// Cursor for the next page. Never followed.
    #[serde(default)]
    pub offset: Option<String>,
}

/// Response of `DELETE /{baseId}/{table}/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedRecord {
    pub id: RecordId,
    #[serde(default)]
    pub deleted: bool,
}

/// Request body for create and update.
#[derive(Debug, Clone, Serialize)]
pub struct FieldsBody<'a> {
    pub fields: &'a Fields,
}

/// Error envelope returned with non-success statuses.
///
/// Airtable sends either `{"error": {"type": "...", "message": "..."}}` or,
/// for some routing errors, `{"error": "NOT_FOUND"}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}

/// The `error` member of [`ErrorEnvelope`].
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Structured {
        #[serde(rename = "type", default)]
        kind: Option<String>,
        #[serde(default)]
        message: Option<String>,
    },
    Code(String),
}

impl ErrorDetail {
    /// The most descriptive text the provider supplied, if any.
    #[must_use]
    pub fn into_message(self) -> Option<String> {
        match self {
            Self::Structured { message, kind } => message
                .filter(|m| !m.trim().is_empty())
                .or_else(|| kind.filter(|k| !k.trim().is_empty())),
            Self::Code(code) if !code.trim().is_empty() => Some(code),
            Self::Code(_) => None,
        }
    }
}

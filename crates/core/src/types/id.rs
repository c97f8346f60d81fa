//! Opaque record identifiers.
//!
//! The remote store assigns an identifier to every record on creation
//! (`recXXXXXXXXXXXXXX` for Airtable). Folio never interprets the value; an
//! entity without a [`RecordId`] is an unsaved, new item.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`RecordId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordIdError {
    /// The input is empty or only whitespace.
    #[error("record id cannot be empty")]
    Empty,
    /// The input contains a path separator and would escape the table URL.
    #[error("record id cannot contain '/'")]
    ContainsSlash,
}

/// Identifier of a record in a remote table.
///
/// ```
/// use folio_core::RecordId;
///
/// let id = RecordId::parse("recA1b2C3d4E5f6G7").unwrap();
/// assert_eq!(id.as_str(), "recA1b2C3d4E5f6G7");
///
/// assert!(RecordId::parse("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Parse a `RecordId`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty or contains `/`.
    pub fn parse(s: &str) -> Result<Self, RecordIdError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(RecordIdError::Empty);
        }
        if trimmed.contains('/') {
            return Err(RecordIdError::ContainsSlash);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `RecordId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for RecordId {
    type Err = RecordIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RecordId {
    type Error = RecordIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

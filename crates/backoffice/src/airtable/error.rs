//! Transport errors.

use thiserror::Error;

/// Errors that can occur when talking to the tabular API.
#[derive(Debug, Error)]
pub enum TransportError {
    /// No API key has been configured. Raised before any request is sent.
    #[error("Unauthenticated: no API key configured")]
    Unauthenticated,

    /// No base id has been configured. Raised before any request is sent.
    #[error("Not configured: no base id set")]
    NotConfigured,

    /// The request URL could not be built from the configured API root.
    #[error("Invalid endpoint: {0}")]
    Endpoint(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a success response.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl TransportError {
    /// Whether the error was raised locally because settings are missing.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Unauthenticated | Self::NotConfigured)
    }
}

//! BackOffice configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `FOLIO_DATA_DIR` - Directory holding the local storage file (default: `.folio`)
//! - `FOLIO_API_BASE_URL` - Tabular API root (default: `https://api.airtable.com/v0`)
//! - `FOLIO_CACHE_TTL_SECS` - Public site content cache TTL (default: 300)
//! - `FOLIO_HTTP_TIMEOUT_SECS` - Per-request HTTP timeout (default: 30)
//!
//! Durations are whole seconds, at most one year.
//!
//! The API key and base id are NOT configured here. They are entered in the
//! BackOffice settings and persisted by the credential store.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default tabular API root.
pub const DEFAULT_API_BASE_URL: &str = "https://api.airtable.com/v0";

const DEFAULT_DATA_DIR: &str = ".folio";
const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
/// Upper bound for every `*_SECS` variable (one year).
const MAX_SECS: u64 = 365 * 24 * 60 * 60;
const LOCAL_STORAGE_FILE: &str = "local-storage.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// BackOffice configuration.
#[derive(Debug, Clone)]
pub struct BackofficeConfig {
    /// Directory holding persisted local state
    pub data_dir: PathBuf,
    /// Root URL of the tabular API; `{baseId}/{table}` is appended
    pub api_base_url: Url,
    /// How long assembled site content stays cached
    pub cache_ttl: Duration,
    /// Per-request HTTP timeout
    pub http_timeout: Duration,
}

impl Default for BackofficeConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            api_base_url: default_api_base_url(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl BackofficeConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup("FOLIO_DATA_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);

        let api_base_url = match lookup("FOLIO_API_BASE_URL") {
            Some(raw) => parse_api_base_url(&raw)?,
            None => default_api_base_url(),
        };

        let cache_ttl = parse_secs(
            "FOLIO_CACHE_TTL_SECS",
            lookup("FOLIO_CACHE_TTL_SECS"),
            DEFAULT_CACHE_TTL_SECS,
        )?;
        let http_timeout = parse_secs(
            "FOLIO_HTTP_TIMEOUT_SECS",
            lookup("FOLIO_HTTP_TIMEOUT_SECS"),
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?;

        Ok(Self {
            data_dir,
            api_base_url,
            cache_ttl,
            http_timeout,
        })
    }

    /// Configuration rooted at `data_dir`, defaults everywhere else.
    #[must_use]
    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Path of the file standing in for browser local storage.
    #[must_use]
    pub fn local_storage_path(&self) -> PathBuf {
        self.data_dir.join(LOCAL_STORAGE_FILE)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

#[allow(clippy::expect_used)]
fn default_api_base_url() -> Url {
    Url::parse(DEFAULT_API_BASE_URL).expect("default API base URL is valid")
}

/// Parse the API root, accepting only http(s) URLs that can carry path segments.
fn parse_api_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar("FOLIO_API_BASE_URL".to_string(), reason);

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot carry a path".to_string()));
    }
    Ok(url)
}

fn parse_secs(key: &str, value: Option<String>, default: u64) -> Result<Duration, ConfigError> {
    let Some(raw) = value else {
        return Ok(Duration::from_secs(default));
    };
    let secs = raw
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if secs > MAX_SECS {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("{secs} exceeds the maximum of {MAX_SECS} seconds"),
        ));
    }
    Ok(Duration::from_secs(secs))
}

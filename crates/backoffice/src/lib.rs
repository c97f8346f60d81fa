//! Folio BackOffice library.
//!
//! Data access for the portfolio site's content tables, the credential store
//! the transport reads its API key from, and the BackOffice login session.
//!
//! Entry point is [`Backoffice`], which wires the pieces together:
//!
//! ```text
//! LocalStore ──► CredentialStore ──► AirtableClient (TableTransport)
//!     │                                     │
//!     └────────► SessionStore               ▼
//!                               Hero/Contact/Portfolio/Career/Skill services
//!                                           │
//!                                           ▼
//!                                  SiteContentLoader (cached)
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod airtable;
pub mod config;
pub mod content;
pub mod credentials;
pub mod services;
pub mod session;
pub mod state;
pub mod storage;

pub use config::{BackofficeConfig, ConfigError};
pub use state::{Backoffice, BackofficeError};

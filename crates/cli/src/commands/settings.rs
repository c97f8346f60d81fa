//! Tabular API credential commands.
//!
//! Changing settings requires a logged-in session. The key is never printed
//! back; `show` only reports whether it is set.

use serde::Serialize;

use folio_backoffice::Backoffice;

use super::{CommandError, print_json};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SettingsView {
    api_key_set: bool,
    base_id: Option<String>,
    configured: bool,
}

pub fn set_key(backoffice: &Backoffice, key: &str) -> Result<(), CommandError> {
    backoffice.require_authenticated()?;
    backoffice.credentials().set_api_key(key)?;
    show(backoffice)
}

pub fn set_base(backoffice: &Backoffice, base_id: &str) -> Result<(), CommandError> {
    backoffice.require_authenticated()?;
    backoffice.credentials().set_base_id(base_id)?;
    show(backoffice)
}

pub fn clear(backoffice: &Backoffice) -> Result<(), CommandError> {
    backoffice.require_authenticated()?;
    backoffice.credentials().clear()?;
    show(backoffice)
}

pub fn show(backoffice: &Backoffice) -> Result<(), CommandError> {
    let credentials = backoffice.credentials();
    print_json(&SettingsView {
        api_key_set: credentials.api_key().is_some(),
        base_id: credentials.base_id(),
        configured: credentials.is_configured(),
    })
}

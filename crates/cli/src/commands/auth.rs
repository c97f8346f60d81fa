//! BackOffice session commands.
//!
//! The session survives between invocations in the local storage file.

use serde_json::json;
use tracing::info;

use folio_backoffice::Backoffice;

use super::{CommandError, print_json};

/// Log in and print the user.
pub fn login(backoffice: &Backoffice, email: &str, password: &str) -> Result<(), CommandError> {
    let user = backoffice.session().login(email, password)?;
    print_json(&user)
}

/// Log out. Logging out while anonymous is not an error.
pub fn logout(backoffice: &Backoffice) -> Result<(), CommandError> {
    if !backoffice.session().is_authenticated() {
        info!("Already logged out");
    }
    backoffice.session().logout()?;
    print_json(&json!({ "isAuthenticated": false }))
}

/// Print the persisted session.
pub fn whoami(backoffice: &Backoffice) -> Result<(), CommandError> {
    print_json(&backoffice.session().session())
}

//! CLI command implementations.

pub mod auth;
pub mod content;
pub mod settings;

use std::io::Read;

use serde::Serialize;
use thiserror::Error;

use folio_backoffice::services::ContentError;
use folio_backoffice::session::AuthError;
use folio_backoffice::storage::StorageError;
use folio_core::RecordIdError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("invalid record id: {0}")]
    RecordId(#[from] RecordIdError),

    /// Input was not the expected JSON shape.
    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read stdin: {0}")]
    Stdin(#[from] std::io::Error),

    /// Some items of a bulk save were written before one failed.
    #[error("saved {committed} item(s), then item {failed_index} failed: {source}")]
    PartialSave {
        committed: usize,
        failed_index: usize,
        #[source]
        source: ContentError,
    },
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CommandError> {
    let rendered = serde_json::to_string_pretty(value)?;
    #[allow(clippy::print_stdout)]
    {
        println!("{rendered}");
    }
    Ok(())
}

/// Resolve a JSON argument, reading stdin when it is `-`.
pub fn read_input(arg: &str) -> Result<String, CommandError> {
    if arg == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(arg.to_owned())
    }
}

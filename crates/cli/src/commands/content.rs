//! Content commands.
//!
//! Reads use the strict service methods so a failing fetch exits non-zero
//! instead of printing an empty list. Writes require a logged-in session.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::info;

use folio_backoffice::Backoffice;
use folio_backoffice::services::{CollectionService, SingletonService, TableRecord};
use folio_core::RecordId;

use super::{CommandError, print_json, read_input};

/// Print the singleton record, or `null` when the table is empty.
pub async fn get_singleton<R>(service: &SingletonService<R>) -> Result<(), CommandError>
where
    R: TableRecord + Serialize,
{
    let item = service.get().await?;
    print_json(&item)
}

/// Create or update the singleton record.
pub async fn set_singleton<R>(
    service: &SingletonService<R>,
    backoffice: &Backoffice,
    input: &str,
) -> Result<(), CommandError>
where
    R: TableRecord + Serialize + DeserializeOwned,
{
    backoffice.require_authenticated()?;
    let item: R = serde_json::from_str(&read_input(input)?)?;
    let saved = service.save(&item).await?;
    print_json(&saved)
}

/// Print every item of a collection.
pub async fn list<R>(service: &CollectionService<R>) -> Result<(), CommandError>
where
    R: TableRecord + Serialize,
{
    let items = service.get_all().await?;
    print_json(&items)
}

/// Save one item (JSON object) or several in order (JSON array).
///
/// On a partial bulk failure the committed items are printed before the
/// error is returned.
pub async fn save<R>(
    service: &CollectionService<R>,
    backoffice: &Backoffice,
    input: &str,
) -> Result<(), CommandError>
where
    R: TableRecord + Serialize + DeserializeOwned,
{
    backoffice.require_authenticated()?;

    match serde_json::from_str::<Value>(&read_input(input)?)? {
        Value::Array(values) => {
            let items = values
                .into_iter()
                .map(serde_json::from_value)
                .collect::<Result<Vec<R>, _>>()?;

            match service.save_all(&items).await {
                Ok(saved) => {
                    info!(count = saved.len(), table = R::TABLE, "Items saved");
                    print_json(&saved)
                }
                Err(e) => {
                    print_json(&e.committed)?;
                    Err(CommandError::PartialSave {
                        committed: e.committed.len(),
                        failed_index: e.failed_index,
                        source: e.error,
                    })
                }
            }
        }
        value => {
            let item: R = serde_json::from_value(value)?;
            let saved = service.save(&item).await?;
            print_json(&saved)
        }
    }
}

/// Delete an item by id.
pub async fn delete<R>(
    service: &CollectionService<R>,
    backoffice: &Backoffice,
    id: &str,
) -> Result<(), CommandError>
where
    R: TableRecord,
{
    backoffice.require_authenticated()?;
    let id = RecordId::parse(id)?;
    let deleted = service.delete(&id).await?;
    print_json(&json!({ "id": id, "deleted": deleted }))
}

/// Print the assembled public site content.
pub async fn site(backoffice: &Backoffice) -> Result<(), CommandError> {
    let content = backoffice.site().load().await;
    print_json(&*content)
}

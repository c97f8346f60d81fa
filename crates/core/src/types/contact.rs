//! Contact details shown in the footer and on the contact section.

use serde::{Deserialize, Serialize};

use super::RecordId;

/// Public contact information.
///
/// Singleton, like [`HeroData`](super::HeroData). No format validation is
/// applied to any field; the BackOffice stores what the editor typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
}

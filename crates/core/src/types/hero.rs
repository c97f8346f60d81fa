//! Hero banner content.

use serde::{Deserialize, Serialize};

use super::RecordId;

/// Title and subtitle shown at the top of the home page.
///
/// Singleton: the site only ever reads the first record of the `Hero` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
}

impl HeroData {
    /// Create an unsaved hero.
    #[must_use]
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            subtitle: subtitle.into(),
        }
    }
}

//! Career timeline entries.

use serde::{Deserialize, Serialize};

use super::RecordId;

/// Kind of timeline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CareerType {
    #[default]
    Work,
    Education,
    Achievement,
}

impl CareerType {
    /// All variants, in display order.
    pub const ALL: [Self; 3] = [Self::Work, Self::Education, Self::Achievement];

    /// The value stored in the remote `Type` field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Education => "education",
            Self::Achievement => "achievement",
        }
    }

    /// Coerce a free-form stored value into a `CareerType`.
    ///
    /// Matching ignores case and surrounding whitespace. Anything unknown,
    /// including an empty field, reads as [`CareerType::Work`].
    #[must_use]
    pub fn from_field(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for CareerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CareerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!("unknown career type: {needle}"))
    }
}

/// A job, degree or award on the career timeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    /// Free text such as `2021 - Present`.
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: CareerType,
}

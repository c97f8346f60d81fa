//! Portfolio projects.

use serde::{Deserialize, Serialize};

use super::RecordId;

/// Separator used when storing tags as a single text field.
pub const TAG_SEPARATOR: &str = ", ";

/// A project card in the portfolio grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Image URL.
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Live demo URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Source repository URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
}

/// Join tags into the single text field stored remotely.
///
/// Tags are trimmed and empty tags are skipped, so joining the output of
/// [`split_tags`] gives back the same string.
///
/// ```
/// use folio_core::join_tags;
///
/// let tags = vec!["React".to_string(), "UI/UX".to_string()];
/// assert_eq!(join_tags(&tags), "React, UI/UX");
/// ```
#[must_use]
pub fn join_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .collect::<Vec<_>>()
        .join(TAG_SEPARATOR)
}

/// Split the stored text field back into tags.
///
/// Splits on commas, trims whitespace and drops empty entries.
///
/// ```
/// use folio_core::split_tags;
///
/// assert_eq!(split_tags("React, UI/UX"), vec!["React", "UI/UX"]);
/// assert_eq!(split_tags(" , Rust,,  "), vec!["Rust"]);
/// assert!(split_tags("").is_empty());
/// ```
#[must_use]
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_roundtrip_is_idempotent() {
        let tags = vec!["React".to_string(), "UI/UX".to_string()];
        let stored = join_tags(&tags);
        assert_eq!(stored, "React, UI/UX");

        let parsed = split_tags(&stored);
        assert_eq!(parsed, tags);
        assert_eq!(join_tags(&parsed), stored);
    }

    #[test]
    fn test_join_skips_blank_tags() {
        let tags = vec![" Rust ".to_string(), "   ".to_string(), "Axum".to_string()];
        assert_eq!(join_tags(&tags), "Rust, Axum");
    }

    #[test]
    fn test_split_without_spaces() {
        assert_eq!(split_tags("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_optional_links_omitted_from_json() {
        let item = PortfolioItem {
            title: "Site".to_string(),
            ..PortfolioItem::default()
        };
        let json = serde_json::to_value(&item).unwrap_or_default();
        assert!(json.get("link").is_none());
        assert!(json.get("github").is_none());
        assert!(json.get("id").is_none());
    }
}

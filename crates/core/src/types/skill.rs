//! Skills grid entries.

use serde::{Deserialize, Serialize};

use super::RecordId;

/// Section of the skills grid a skill is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Web,
    Api,
    Software,
    Network,
    Data,
    #[default]
    Other,
}

impl SkillCategory {
    /// All variants, in display order.
    pub const ALL: [Self; 6] = [
        Self::Web,
        Self::Api,
        Self::Software,
        Self::Network,
        Self::Data,
        Self::Other,
    ];

    /// The value stored in the remote `Category` field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Api => "api",
            Self::Software => "software",
            Self::Network => "network",
            Self::Data => "data",
            Self::Other => "other",
        }
    }

    /// Heading used on the public skills section.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Web => "Web Development",
            Self::Api => "APIs & Backend",
            Self::Software => "Software",
            Self::Network => "Networking",
            Self::Data => "Data",
            Self::Other => "Other",
        }
    }

    /// Coerce a free-form stored value; unknown values read as `Other`.
    #[must_use]
    pub fn from_field(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SkillCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!("unknown skill category: {needle}"))
    }
}

/// A single skill with an optional inline SVG logo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: SkillCategory,
    /// Raw SVG markup, rendered as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_svg: Option<String>,
}

impl SkillItem {
    /// Create an unsaved skill without a logo.
    #[must_use]
    pub fn new(name: impl Into<String>, category: SkillCategory) -> Self {
        Self {
            id: None,
            name: name.into(),
            category,
            logo_svg: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_field_case_insensitive() {
        assert_eq!(SkillCategory::from_field("API"), SkillCategory::Api);
        assert_eq!(SkillCategory::from_field(" network"), SkillCategory::Network);
    }

    #[test]
    fn test_from_field_unknown_is_other() {
        assert_eq!(SkillCategory::from_field("devops"), SkillCategory::Other);
    }

    #[test]
    fn test_logo_svg_camel_case() {
        let json = r#"{"name":"Go","category":"other","logoSvg":"<svg/>"}"#;
        let skill: SkillItem = serde_json::from_str(json).unwrap();
        assert_eq!(skill.logo_svg.as_deref(), Some("<svg/>"));
        assert_eq!(skill.category, SkillCategory::Other);
        assert!(skill.id.is_none());
    }
}

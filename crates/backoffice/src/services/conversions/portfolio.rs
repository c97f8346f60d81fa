use folio_core::{PortfolioItem, RecordId, join_tags};

use super::{optional_text, put_optional, put_text, text, text_list};
use crate::airtable::{Fields, Record};
use crate::services::TableRecord;

const TITLE: &str = "Title";
const DESCRIPTION: &str = "Description";
const IMAGE: &str = "Image";
const TAGS: &str = "Tags";
const LINK: &str = "Link";
const GITHUB: &str = "GitHub";

impl TableRecord for PortfolioItem {
    const TABLE: &'static str = "Portfolio";

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn from_record(record: Record) -> Self {
        let fields = &record.fields;
        Self {
            title: text(fields, TITLE),
            description: text(fields, DESCRIPTION),
            image: text(fields, IMAGE),
            tags: text_list(fields, TAGS),
            link: optional_text(fields, LINK),
            github: optional_text(fields, GITHUB),
            id: Some(record.id),
        }
    }

    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        put_text(&mut fields, TITLE, &self.title);
        put_text(&mut fields, DESCRIPTION, &self.description);
        put_text(&mut fields, IMAGE, &self.image);
        put_text(&mut fields, TAGS, &join_tags(&self.tags));
        put_optional(&mut fields, LINK, self.link.as_deref());
        put_optional(&mut fields, GITHUB, self.github.as_deref());
        fields
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_tags_stored_comma_joined() {
        let item = PortfolioItem {
            title: "Design system".to_string(),
            tags: vec!["React".to_string(), "UI/UX".to_string()],
            ..PortfolioItem::default()
        };
        let fields = item.to_fields();
        assert_eq!(fields[TAGS], "React, UI/UX");
        assert!(fields[LINK].is_null());
    }

    #[test]
    fn test_from_record_defaults() {
        let record = Record {
            id: RecordId::parse("recP1").unwrap(),
            created_time: None,
            fields: json!({"Title": "Only a title", "Tags": "React,  UI/UX ,"})
                .as_object()
                .cloned()
                .unwrap(),
        };
        let item = PortfolioItem::from_record(record);

        assert_eq!(item.id.as_ref().map(RecordId::as_str), Some("recP1"));
        assert_eq!(item.title, "Only a title");
        assert_eq!(item.description, "");
        assert_eq!(item.image, "");
        assert_eq!(item.tags, vec!["React", "UI/UX"]);
        assert!(item.link.is_none());
        assert!(item.github.is_none());
    }
}

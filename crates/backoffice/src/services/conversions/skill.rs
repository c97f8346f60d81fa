use folio_core::{RecordId, SkillCategory, SkillItem};

use super::{optional_text, put_optional, put_text, text};
use crate::airtable::{Fields, Record};
use crate::services::TableRecord;

const NAME: &str = "Name";
const CATEGORY: &str = "Category";
const LOGO_SVG: &str = "LogoSvg";

impl TableRecord for SkillItem {
    const TABLE: &'static str = "Skills";

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn from_record(record: Record) -> Self {
        let fields = &record.fields;
        Self {
            name: text(fields, NAME),
            category: SkillCategory::from_field(&text(fields, CATEGORY)),
            logo_svg: optional_text(fields, LOGO_SVG),
            id: Some(record.id),
        }
    }

    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        put_text(&mut fields, NAME, &self.name);
        put_text(&mut fields, CATEGORY, self.category.as_str());
        put_optional(&mut fields, LOGO_SVG, self.logo_svg.as_deref());
        fields
    }
}

use folio_core::{HeroData, RecordId};

use super::{put_text, text};
use crate::airtable::{Fields, Record};
use crate::services::TableRecord;

const TITLE: &str = "Title";
const SUBTITLE: &str = "Subtitle";

impl TableRecord for HeroData {
    const TABLE: &'static str = "Hero";

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn from_record(record: Record) -> Self {
        Self {
            title: text(&record.fields, TITLE),
            subtitle: text(&record.fields, SUBTITLE),
            id: Some(record.id),
        }
    }

    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        put_text(&mut fields, TITLE, &self.title);
        put_text(&mut fields, SUBTITLE, &self.subtitle);
        fields
    }
}

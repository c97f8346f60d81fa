use folio_core::{CareerItem, CareerType, RecordId};

use super::{put_text, text};
use crate::airtable::{Fields, Record};
use crate::services::TableRecord;

const TITLE: &str = "Title";
const COMPANY: &str = "Company";
const LOCATION: &str = "Location";
const PERIOD: &str = "Period";
const DESCRIPTION: &str = "Description";
const TYPE: &str = "Type";

impl TableRecord for CareerItem {
    const TABLE: &'static str = "Career";

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn from_record(record: Record) -> Self {
        let fields = &record.fields;
        Self {
            title: text(fields, TITLE),
            company: text(fields, COMPANY),
            location: text(fields, LOCATION),
            period: text(fields, PERIOD),
            description: text(fields, DESCRIPTION),
            kind: CareerType::from_field(&text(fields, TYPE)),
            id: Some(record.id),
        }
    }

    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        put_text(&mut fields, TITLE, &self.title);
        put_text(&mut fields, COMPANY, &self.company);
        put_text(&mut fields, LOCATION, &self.location);
        put_text(&mut fields, PERIOD, &self.period);
        put_text(&mut fields, DESCRIPTION, &self.description);
        put_text(&mut fields, TYPE, self.kind.as_str());
        fields
    }
}

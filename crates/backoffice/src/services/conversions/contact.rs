use folio_core::{ContactInfo, RecordId};

use super::{put_text, text};
use crate::airtable::{Fields, Record};
use crate::services::TableRecord;

const EMAIL: &str = "Email";
const PHONE: &str = "Phone";
const LOCATION: &str = "Location";

impl TableRecord for ContactInfo {
    const TABLE: &'static str = "Contact";

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn from_record(record: Record) -> Self {
        Self {
            email: text(&record.fields, EMAIL),
            phone: text(&record.fields, PHONE),
            location: text(&record.fields, LOCATION),
            id: Some(record.id),
        }
    }

    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        put_text(&mut fields, EMAIL, &self.email);
        put_text(&mut fields, PHONE, &self.phone);
        put_text(&mut fields, LOCATION, &self.location);
        fields
    }
}

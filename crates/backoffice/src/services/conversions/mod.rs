//! Field-bag conversions for each content type.
//!
//! Reading never fails: a missing or non-text cell becomes an empty string,
//! and an empty optional cell becomes `None`. On write, absent optionals are
//! `null` so an update clears the cell.

mod career;
mod contact;
mod hero;
mod portfolio;
mod skill;

use serde_json::Value;

use crate::airtable::Fields;

/// Read a text cell. Numbers and booleans are rendered; anything else is empty.
fn text(fields: &Fields, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Read an optional text cell; blank reads as `None`.
fn optional_text(fields: &Fields, key: &str) -> Option<String> {
    let value = text(fields, key);
    (!value.trim().is_empty()).then_some(value)
}

/// Read a list cell stored either as comma-joined text or as a JSON array
/// (multiple-select columns).
fn text_list(fields: &Fields, key: &str) -> Vec<String> {
    match fields.get(key) {
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(ToOwned::to_owned)
            .collect(),
        _ => folio_core::split_tags(&text(fields, key)),
    }
}

fn put_text(fields: &mut Fields, key: &str, value: &str) {
    fields.insert(key.to_owned(), Value::String(value.to_owned()));
}

fn put_optional(fields: &mut Fields, key: &str, value: Option<&str>) {
    let value = value
        .filter(|v| !v.trim().is_empty())
        .map_or(Value::Null, |v| Value::String(v.to_owned()));
    fields.insert(key.to_owned(), value);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn fields(value: Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_text_defaults_to_empty() {
        let f = fields(json!({"A": "x", "B": 3, "C": null, "D": ["x"]}));
        assert_eq!(text(&f, "A"), "x");
        assert_eq!(text(&f, "B"), "3");
        assert_eq!(text(&f, "C"), "");
        assert_eq!(text(&f, "D"), "");
        assert_eq!(text(&f, "Missing"), "");
    }

    #[test]
    fn test_optional_text_blank_is_none() {
        let f = fields(json!({"Link": "  ", "GitHub": "https://github.com/x"}));
        assert!(optional_text(&f, "Link").is_none());
        assert_eq!(
            optional_text(&f, "GitHub").as_deref(),
            Some("https://github.com/x")
        );
    }

    #[test]
    fn test_text_list_accepts_both_shapes() {
        let f = fields(json!({"Joined": "a, b,, c ", "Multi": ["a", " b ", ""]}));
        assert_eq!(text_list(&f, "Joined"), vec!["a", "b", "c"]);
        assert_eq!(text_list(&f, "Multi"), vec!["a", "b"]);
        assert!(text_list(&f, "Missing").is_empty());
    }

    #[test]
    fn test_put_optional() {
        let mut f = Fields::new();
        put_optional(&mut f, "Some", Some("v"));
        put_optional(&mut f, "Blank", Some(" "));
        put_optional(&mut f, "None", None);
        assert_eq!(f["Some"], "v");
        assert!(f["Blank"].is_null());
        assert!(f["None"].is_null());
    }
}

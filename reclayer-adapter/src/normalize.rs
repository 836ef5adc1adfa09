//! Null/default filling of absent record fields on create.
//!
//! When enabled, every field the record type declares but the incoming
//! record leaves absent (or falsy) is written explicitly: an empty sequence
//! for array fields, a null marker otherwise. This keeps stored documents
//! shaped like their descriptors instead of omitting keys. When disabled,
//! absent fields stay absent and the store simply never holds the key.

use bson::Bson;

use reclayer_core::schema::RecordType;

use crate::value::is_falsy;

/// Fills absent (falsy) fields in place before the record is written.
pub fn null_undefined_fields(record: &mut bson::Document, record_type: &RecordType) {
    for (field, def) in record_type.iter() {
        let absent = record.get(field).is_none_or(is_falsy);

        if absent {
            let filler = if def.is_array {
                Bson::Array(Vec::new())
            } else {
                Bson::Null
            };
            record.insert(field, filler);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    use reclayer_core::schema::{FieldDef, FieldKind};

    fn record_type() -> RecordType {
        RecordType::new()
            .field("name", FieldDef::new(FieldKind::Text))
            .field("age", FieldDef::new(FieldKind::Integer))
            .field("friends", FieldDef::new(FieldKind::Integer).array())
    }

    #[test]
    fn absent_fields_are_filled() {
        let mut record = doc! { "name": "a" };
        null_undefined_fields(&mut record, &record_type());

        assert_eq!(record.get("name"), Some(&Bson::String("a".into())));
        assert_eq!(record.get("age"), Some(&Bson::Null));
        assert_eq!(record.get("friends"), Some(&Bson::Array(vec![])));
    }

    #[test]
    fn falsy_values_are_refilled() {
        // Loose-typing semantics: an explicit empty string counts as absent.
        let mut record = doc! { "name": "" };
        null_undefined_fields(&mut record, &record_type());

        assert_eq!(record.get("name"), Some(&Bson::Null));
    }

    #[test]
    fn present_arrays_survive_even_when_empty() {
        let mut record = doc! { "friends": [7] };
        null_undefined_fields(&mut record, &record_type());

        assert_eq!(record.get_array("friends").unwrap().len(), 1);
    }

    #[test]
    fn undeclared_fields_are_untouched() {
        let mut record = doc! { "nickname": "al" };
        null_undefined_fields(&mut record, &record_type());

        assert_eq!(record.get("nickname"), Some(&Bson::String("al".into())));
    }
}

//! Client-side re-application of predicates the store cannot evaluate.
//!
//! Three families of predicates come back from the translator unapplied and
//! are re-checked here against the fetched documents: positional range
//! bounds on array fields, list matches on plain fields (OR semantics), and
//! existence predicates. Applied in that order, after decoding, so the
//! predicates see framework-native values.

use bson::{Bson, Document};

use reclayer_core::{
    error::AdapterResult,
    options::{FindOptions, Matcher, Records},
    schema::Schema,
};

use crate::value::is_truthy;

/// Filters fetched records down to the ones satisfying every deferred
/// predicate and recomputes the result count.
pub fn post_filter(
    records: Vec<Document>,
    type_name: &str,
    options: &FindOptions,
    schema: &Schema,
) -> AdapterResult<Records> {
    let mut records = records;

    for (field, (lower, upper)) in &options.range {
        let def = schema.field(type_name, field)?;
        if !def.is_array {
            continue;
        }
        records.retain(|record| array_in_range(record, field, lower, upper));
    }

    for (field, matcher) in &options.matches {
        let def = schema.field(type_name, field)?;
        if def.is_link() || def.is_array {
            continue;
        }
        let Matcher::Any(values) = matcher else {
            continue;
        };
        records.retain(|record| {
            record
                .get(field)
                .is_some_and(|value| values.contains(value))
        });
    }

    for (field, should_exist) in &options.exists {
        let def = schema.field(type_name, field)?;
        if def.is_array {
            // An array field "exists" when it has at least one element; the
            // normalizer fills absent arrays with [].
            records.retain(|record| {
                let populated = matches!(record.get(field), Some(Bson::Array(items)) if !items.is_empty());
                populated == *should_exist
            });
        } else {
            records.retain(|record| record.contains_key(field) == *should_exist);
        }
    }

    Ok(Records::new(records))
}

/// Positional range check on an array field: a `[lower, upper]` bound keeps
/// documents whose array has a truthy element at position `lower - 1` and no
/// element at position `upper`. A missing field counts as an empty array.
fn array_in_range(
    record: &Document,
    field: &str,
    lower: &Option<Bson>,
    upper: &Option<Bson>,
) -> bool {
    static EMPTY: Vec<Bson> = Vec::new();
    let items = match record.get(field) {
        Some(Bson::Array(items)) => items,
        _ => &EMPTY,
    };

    if let Some(lower) = lower.as_ref().and_then(bound_index) {
        let reached = element_at(items, lower - 1).is_some_and(is_truthy);
        if !reached {
            return false;
        }
    }
    if let Some(upper) = upper.as_ref().and_then(bound_index) {
        let exceeded = element_at(items, upper).is_some_and(is_truthy);
        if exceeded {
            return false;
        }
    }
    true
}

fn bound_index(bound: &Bson) -> Option<i64> {
    match bound {
        Bson::Int32(i) => Some(i64::from(*i)),
        Bson::Int64(i) => Some(*i),
        Bson::Double(f) => Some(*f as i64),
        _ => None,
    }
}

fn element_at(items: &[Bson], index: i64) -> Option<&Bson> {
    usize::try_from(index).ok().and_then(|i| items.get(i))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    use reclayer_core::schema::{FieldDef, FieldKind, RecordType};

    fn schema() -> Schema {
        Schema::new("id").record_type(
            "user",
            RecordType::new()
                .field("name", FieldDef::new(FieldKind::Text))
                .field("friends", FieldDef::new(FieldKind::Integer).array()),
        )
    }

    #[test]
    fn array_range_checks_element_count() {
        let records = vec![
            doc! { "id": "a", "friends": [1, 2] },
            doc! { "id": "b", "friends": [1, 2, 3] },
            doc! { "id": "c", "friends": [1, 2, 3, 4] },
        ];
        let options = FindOptions::new().range("friends", Some(2), Some(3));

        let result = post_filter(records, "user", &options, &schema()).unwrap();

        assert_eq!(result.count, 2);
        assert_eq!(result[0].get_str("id").unwrap(), "a");
        assert_eq!(result[1].get_str("id").unwrap(), "b");
    }

    #[test]
    fn array_range_treats_missing_field_as_empty() {
        let records = vec![doc! { "id": "a" }];
        let options = FindOptions::new().range("friends", Some(1), None::<Bson>);

        let result = post_filter(records, "user", &options, &schema()).unwrap();

        assert_eq!(result.count, 0);
    }

    #[test]
    fn zero_lower_bound_matches_nothing() {
        // Position lower - 1 is out of range for a bound of zero, so the
        // predicate can never hold.
        let records = vec![doc! { "id": "a", "friends": [1] }];
        let options = FindOptions::new().range("friends", Some(0), None::<Bson>);

        let result = post_filter(records, "user", &options, &schema()).unwrap();

        assert_eq!(result.count, 0);
    }

    #[test]
    fn list_match_keeps_members() {
        let records = vec![
            doc! { "id": "a", "name": "ann" },
            doc! { "id": "b", "name": "bob" },
            doc! { "id": "c", "name": "cai" },
        ];
        let options = FindOptions::new().matching_any("name", ["ann", "cai"]);

        let result = post_filter(records, "user", &options, &schema()).unwrap();

        assert_eq!(result.count, 2);
        assert_eq!(result[0].get_str("name").unwrap(), "ann");
        assert_eq!(result[1].get_str("name").unwrap(), "cai");
    }

    #[test]
    fn list_match_drops_missing_field() {
        let records = vec![doc! { "id": "a" }];
        let options = FindOptions::new().matching_any("name", ["ann"]);

        let result = post_filter(records, "user", &options, &schema()).unwrap();

        assert_eq!(result.count, 0);
    }

    #[test]
    fn exists_checks_key_presence_on_scalars() {
        let records = vec![
            doc! { "id": "a", "name": "ann" },
            doc! { "id": "b" },
        ];

        let present = post_filter(
            records.clone(),
            "user",
            &FindOptions::new().exists("name", true),
            &schema(),
        )
        .unwrap();
        assert_eq!(present.count, 1);
        assert_eq!(present[0].get_str("id").unwrap(), "a");

        let absent = post_filter(
            records,
            "user",
            &FindOptions::new().exists("name", false),
            &schema(),
        )
        .unwrap();
        assert_eq!(absent.count, 1);
        assert_eq!(absent[0].get_str("id").unwrap(), "b");
    }

    #[test]
    fn exists_checks_emptiness_on_arrays() {
        let records = vec![
            doc! { "id": "a", "friends": [1] },
            doc! { "id": "b", "friends": [] },
            doc! { "id": "c" },
        ];
        let options = FindOptions::new().exists("friends", true);

        let result = post_filter(records, "user", &options, &schema()).unwrap();

        assert_eq!(result.count, 1);
        assert_eq!(result[0].get_str("id").unwrap(), "a");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let options = FindOptions::new().exists("height", true);

        assert!(post_filter(vec![], "user", &options, &schema()).is_err());
    }
}

//! Translation of abstract find options into native store queries.
//!
//! The store's query surface is narrow: chained per-field filters
//! (equality, `>=`, `<=`, array-contains), `orderBy`, `limit`, `offset`.
//! No OR, no positional array filters. The translator maps everything the
//! store can evaluate onto that surface and leaves the rest for the
//! post-filter stage:
//!
//! - range bounds on array fields are deferred entirely;
//! - list-valued matches on plain fields (OR semantics) are deferred;
//! - link matches filter on the inverse field, array-contains when the
//!   link is array-valued;
//! - buffer matches are compared against the encoded string form.
//!
//! Options are processed range → match → sort → limit → offset; the store's
//! chained builder is order-sensitive, so the clause order is preserved.

use bson::Bson;

use reclayer_core::{
    error::AdapterResult,
    options::{FindOptions, Matcher},
    query::{NativeQuery, WhereOp},
    schema::{FieldKind, Schema},
    timestamp::Timestamp,
};

use crate::{codec::RecordCodec, config::AdapterOptions};

/// Builds the native query for one find call.
///
/// Fails when an option references a field the record type does not
/// declare. Store-level failures happen later, at execution, and propagate
/// unmodified.
pub fn translate(
    type_name: &str,
    options: &FindOptions,
    schema: &Schema,
    codec: &RecordCodec,
    config: &AdapterOptions,
) -> AdapterResult<NativeQuery> {
    let mut query = NativeQuery::new();

    for (field, (lower, upper)) in &options.range {
        let def = schema.field(type_name, field)?;
        if def.is_array {
            // The store cannot express positional bounds over arrays;
            // handled by the post-filter stage.
            continue;
        }

        if let Some(lower) = lower {
            query = query.filter(field.clone(), WhereOp::Gte, store_bound(lower));
        }
        if let Some(upper) = upper {
            query = query.filter(field.clone(), WhereOp::Lte, store_bound(upper));
        }
    }

    for (field, matcher) in &options.matches {
        let def = schema.field(type_name, field)?;

        if def.is_link() {
            // Links are denormalized: match against the inverse field on
            // the related documents rather than joining.
            let target = def
                .inverse
                .clone()
                .or_else(|| {
                    def.link
                        .as_deref()
                        .map(|link| config.collection(link).to_string())
                })
                .unwrap_or_else(|| field.clone());
            let value = match matcher {
                Matcher::One(value) => value.clone(),
                Matcher::Any(values) => Bson::Array(values.clone()),
            };

            let op = if def.is_array { WhereOp::ArrayContains } else { WhereOp::Eq };
            query = query.filter(target, op, value);
            continue;
        }

        if def.kind == FieldKind::Buffer {
            if def.is_array {
                // A list matcher against an array of buffers only uses its
                // first element; the store has no multi-value membership op.
                let value = match matcher {
                    Matcher::One(value) => Some(value),
                    Matcher::Any(values) => values.first(),
                };
                if let Some(value) = value {
                    query = query.filter(
                        field.clone(),
                        WhereOp::ArrayContains,
                        codec.encode_buffer(value)?,
                    );
                }
            } else if let Matcher::One(value) = matcher {
                query = query.filter(field.clone(), WhereOp::Eq, codec.encode_buffer(value)?);
            }
            // A list matcher on a scalar buffer field is OR semantics;
            // deferred like any other list match.
            continue;
        }

        if let Matcher::One(value) = matcher {
            query = query.filter(field.clone(), WhereOp::Eq, value.clone());
        }
        // Matcher::Any on a plain field needs OR, which the store lacks;
        // deferred to the post-filter stage.
    }

    for (field, direction) in &options.sort {
        schema.field(type_name, field)?;
        query = query.order_by(field.clone(), *direction);
    }

    if let Some(limit) = options.limit {
        query = query.limit(limit);
    }
    if let Some(offset) = options.offset {
        query = query.offset(offset);
    }

    Ok(query)
}

/// Converts a date boundary into the store's native timestamp form; other
/// values pass through untouched.
fn store_bound(value: &Bson) -> Bson {
    match value {
        Bson::DateTime(datetime) => Timestamp::from_datetime(*datetime).into(),
        other => other.clone(),
    }
}

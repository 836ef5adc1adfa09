//! Client-side evaluation of native query clauses.
//!
//! The in-memory store has no server to push filters to, so it evaluates
//! where clauses and sort comparisons itself, over plain BSON documents.

use bson::{Bson, DateTime};
use std::{cmp::Ordering, collections::HashMap};

use reclayer_core::{
    query::{WhereClause, WhereOp},
    timestamp::Timestamp,
};

/// Type-erased, comparable view of BSON values.
///
/// Numeric types are normalized to f64, and documents with the store-native
/// `{seconds, nanoseconds}` shape are read as date/time values so that range
/// filters over date fields order correctly.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    Null,
    Bool(bool),
    Number(f64),
    DateTime(DateTime),
    String(&'a str),
    Array(Vec<Comparable<'a>>),
    Map(HashMap<&'a str, Comparable<'a>>),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Number(*value as f64),
            Bson::Int64(value) => Comparable::Number(*value as f64),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::DateTime(value) => Comparable::DateTime(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Array(arr) => Comparable::Array(
                arr.iter()
                    .map(Comparable::from)
                    .collect::<Vec<_>>(),
            ),
            Bson::Document(doc) => match Timestamp::from_document(doc) {
                Some(pair) => Comparable::DateTime(pair.to_datetime()),
                None => Comparable::Map(
                    doc.iter()
                        .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                        .collect::<HashMap<_, _>>(),
                ),
            },
            _ => Comparable::Null, // Other types are not comparable
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl<'a> PartialOrd for Comparable<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Bool(a), Comparable::Bool(b)) => a.partial_cmp(b),
            (Comparable::Number(a), Comparable::Number(b)) => a.partial_cmp(b),
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a.partial_cmp(b),
            (Comparable::String(a), Comparable::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

/// Evaluates one where clause against a document.
///
/// A missing field never matches, mirroring how the real store drops
/// documents without the filtered field from indexed results.
pub(crate) fn matches_clause(document: &bson::Document, clause: &WhereClause) -> bool {
    let Some(field_value) = document.get(&clause.field) else {
        return false;
    };

    let left = Comparable::from(field_value);
    let right = Comparable::from(&clause.value);

    match clause.op {
        WhereOp::Eq => left == right,
        WhereOp::Gte => matches!(
            left.partial_cmp(&right),
            Some(Ordering::Greater) | Some(Ordering::Equal)
        ),
        WhereOp::Lte => matches!(
            left.partial_cmp(&right),
            Some(Ordering::Less) | Some(Ordering::Equal)
        ),
        WhereOp::ArrayContains => match left {
            Comparable::Array(elements) => elements.iter().any(|item| item == &right),
            _ => false,
        },
    }
}

/// Compares two documents on one field for sorting. Missing fields sort as
/// null; incomparable pairs compare equal.
pub(crate) fn compare_field(a: &bson::Document, b: &bson::Document, field: &str) -> Ordering {
    let left = a.get(field).map(Comparable::from).unwrap_or(Comparable::Null);
    let right = b.get(field).map(Comparable::from).unwrap_or(Comparable::Null);

    left.partial_cmp(&right).unwrap_or(Ordering::Equal)
}

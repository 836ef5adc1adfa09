//! The document store's native timestamp representation.
//!
//! Date fields come back from the store as a `{seconds, nanoseconds}` pair
//! rather than a first-class date value. This module holds the wire shape
//! and its conversions to and from [`bson::DateTime`], which is the
//! framework-native date form on the adapter side.

use bson::{Bson, DateTime, Document, doc};
use serde::{Deserialize, Serialize};

/// A store-native timestamp: whole seconds since the Unix epoch plus a
/// nanosecond remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanoseconds: i32,
}

impl Timestamp {
    pub fn new(seconds: i64, nanoseconds: i32) -> Self {
        Self { seconds, nanoseconds }
    }

    /// Splits a framework-native date into the store's pair form.
    pub fn from_datetime(datetime: DateTime) -> Self {
        let millis = datetime.timestamp_millis();
        Self {
            seconds: millis.div_euclid(1000),
            nanoseconds: (millis.rem_euclid(1000) * 1_000_000) as i32,
        }
    }

    /// Collapses the pair back into a framework-native date.
    ///
    /// Sub-millisecond precision is dropped, which keeps round trips within
    /// a sub-second epsilon of the original value.
    pub fn to_datetime(self) -> DateTime {
        DateTime::from_millis(self.seconds * 1000 + i64::from(self.nanoseconds) / 1_000_000)
    }

    /// Renders the pair as the store's document form.
    pub fn to_document(self) -> Document {
        doc! { "seconds": self.seconds, "nanoseconds": self.nanoseconds }
    }

    /// Reads a pair out of a store document, if the document has exactly the
    /// pair shape.
    pub fn from_document(document: &Document) -> Option<Self> {
        if document.len() != 2 {
            return None;
        }

        Some(Self {
            seconds: int_field(document, "seconds")?,
            nanoseconds: int_field(document, "nanoseconds")? as i32,
        })
    }

    /// Reads a pair out of any BSON value holding the document form.
    pub fn from_bson(value: &Bson) -> Option<Self> {
        value.as_document().and_then(Self::from_document)
    }
}

impl From<Timestamp> for Bson {
    fn from(timestamp: Timestamp) -> Bson {
        Bson::Document(timestamp.to_document())
    }
}

fn int_field(document: &Document, key: &str) -> Option<i64> {
    match document.get(key)? {
        Bson::Int32(value) => Some(i64::from(*value)),
        Bson::Int64(value) => Some(*value),
        _ => None,
    }
}

//! Bidirectional type coercion between store and framework value forms.
//!
//! The document store cannot hold binary buffers, so buffer-typed fields
//! travel as text-encoded strings; date-typed fields come back from reads
//! as `{seconds, nanoseconds}` pairs. The codec converts both directions,
//! driven entirely by the record type descriptor:
//!
//! - `encode` turns framework records into store documents. Only binary
//!   fields change shape; date values are accepted natively by the store
//!   and are written as-is.
//! - `decode` turns store documents back into framework records: timestamp
//!   pairs become date values (when enabled) and encoded strings become
//!   binary buffers, element-wise for array-valued buffer fields.
//!
//! Both directions are pure and no-ops on absent fields. Date arrays are
//! not decoded element-wise; the store's own array indexing makes them
//! impractical to query anyway, and the original contract never converted
//! them.

use bson::{Binary, Bson, Document, spec::BinarySubtype};

use reclayer_core::{
    error::{AdapterError, AdapterResult},
    schema::{FieldKind, RecordType},
    timestamp::Timestamp,
};

use crate::config::BufferEncoding;

/// Per-configuration codec for record/document coercion.
#[derive(Debug, Clone, Copy)]
pub struct RecordCodec {
    encoding: BufferEncoding,
    convert_timestamps: bool,
}

impl RecordCodec {
    pub fn new(encoding: BufferEncoding, convert_timestamps: bool) -> Self {
        Self { encoding, convert_timestamps }
    }

    /// Converts a fetched store document into a framework record.
    pub fn decode(&self, mut document: Document, record_type: &RecordType) -> AdapterResult<Document> {
        if self.convert_timestamps {
            for field in record_type.fields_of_kind(FieldKind::DateTime) {
                let Some(value) = document.get(field) else {
                    continue;
                };

                if let Some(pair) = Timestamp::from_bson(value) {
                    document.insert(field, Bson::DateTime(pair.to_datetime()));
                }
            }
        }

        for (field, def) in record_type.iter() {
            if def.kind != FieldKind::Buffer {
                continue;
            }
            let Some(value) = document.get(field) else {
                continue;
            };

            let decoded = if def.is_array {
                match value {
                    Bson::Array(items) => Bson::Array(
                        items
                            .iter()
                            .map(|item| self.decode_buffer(item))
                            .collect::<AdapterResult<Vec<_>>>()?,
                    ),
                    _ => continue,
                }
            } else {
                self.decode_buffer(value)?
            };

            document.insert(field, decoded);
        }

        Ok(document)
    }

    /// Converts a framework record into a store document before writing.
    pub fn encode(&self, mut record: Document, record_type: &RecordType) -> AdapterResult<Document> {
        for (field, def) in record_type.iter() {
            if def.kind != FieldKind::Buffer {
                continue;
            }
            let Some(value) = record.get(field) else {
                continue;
            };

            let encoded = if def.is_array {
                match value {
                    Bson::Array(items) => Bson::Array(
                        items
                            .iter()
                            .map(|item| self.encode_buffer(item))
                            .collect::<AdapterResult<Vec<_>>>()?,
                    ),
                    _ => continue,
                }
            } else {
                self.encode_buffer(value)?
            };

            record.insert(field, encoded);
        }

        Ok(record)
    }

    /// Encodes one buffer value into its store text form. Used for record
    /// bodies and for match values against buffer fields.
    pub fn encode_buffer(&self, value: &Bson) -> AdapterResult<Bson> {
        match value {
            Bson::Binary(binary) => Ok(Bson::String(self.encoding.encode(&binary.bytes))),
            Bson::Null => Ok(Bson::Null),
            other => Err(AdapterError::Coercion(format!(
                "expected binary value, got {other}"
            ))),
        }
    }

    fn decode_buffer(&self, value: &Bson) -> AdapterResult<Bson> {
        match value {
            Bson::String(text) => Ok(Bson::Binary(Binary {
                subtype: BinarySubtype::Generic,
                bytes: self.encoding.decode(text)?,
            })),
            Bson::Null => Ok(Bson::Null),
            other => Err(AdapterError::Coercion(format!(
                "expected encoded string, got {other}"
            ))),
        }
    }
}

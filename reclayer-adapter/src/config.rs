//! Adapter configuration.
//!
//! The adapter recognizes exactly four options of its own; every other key
//! in the supplied configuration is forwarded verbatim to the store
//! client's constructor. The split happens once, at configuration time,
//! against an explicit allowlist.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use bson::{Bson, Document};
use std::collections::HashMap;

use reclayer_core::error::{AdapterError, AdapterResult};

/// Option keys this layer consumes itself rather than forwarding.
const ADAPTER_OPTIONS: [&str; 4] = [
    "typeMap",
    "bufferEncoding",
    "convertTimestamps",
    "nullUndefinedFields",
];

/// Text encoding used for binary fields on the store side.
///
/// Must be applied consistently between encode and decode within one
/// adapter configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BufferEncoding {
    #[default]
    Base64,
    Hex,
}

impl BufferEncoding {
    /// Encodes raw bytes into the store's text form.
    pub fn encode(&self, bytes: &[u8]) -> String {
        match self {
            BufferEncoding::Base64 => BASE64.encode(bytes),
            BufferEncoding::Hex => hex::encode(bytes),
        }
    }

    /// Decodes the store's text form back into raw bytes.
    pub fn decode(&self, text: &str) -> AdapterResult<Vec<u8>> {
        match self {
            BufferEncoding::Base64 => BASE64
                .decode(text)
                .map_err(|e| AdapterError::Coercion(e.to_string())),
            BufferEncoding::Hex => {
                hex::decode(text).map_err(|e| AdapterError::Coercion(e.to_string()))
            }
        }
    }

    fn parse(name: &str) -> AdapterResult<Self> {
        match name {
            "base64" => Ok(BufferEncoding::Base64),
            "hex" => Ok(BufferEncoding::Hex),
            other => Err(AdapterError::Initialization(format!(
                "unsupported buffer encoding: {other}"
            ))),
        }
    }
}

/// Resolved adapter configuration.
#[derive(Debug, Clone)]
pub struct AdapterOptions {
    /// Record-type name -> store collection name. Unmapped types use their
    /// own name.
    pub type_map: HashMap<String, String>,
    /// Text encoding for binary fields.
    pub buffer_encoding: BufferEncoding,
    /// Whether to decode store timestamp pairs into date values on read.
    pub convert_timestamps: bool,
    /// Whether to null/empty-fill absent fields on create.
    pub null_undefined_fields: bool,
    /// All unrecognized keys, forwarded to the store client constructor.
    pub store_params: Document,
}

impl Default for AdapterOptions {
    fn default() -> Self {
        Self {
            type_map: HashMap::new(),
            buffer_encoding: BufferEncoding::default(),
            convert_timestamps: true,
            null_undefined_fields: true,
            store_params: Document::new(),
        }
    }
}

impl AdapterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits a raw configuration document into recognized adapter options
    /// and pass-through store parameters, applying defaults for anything
    /// absent.
    pub fn from_document(raw: Document) -> AdapterResult<Self> {
        let mut options = Self::default();

        for (key, value) in raw {
            if !ADAPTER_OPTIONS.contains(&key.as_str()) {
                options.store_params.insert(key, value);
                continue;
            }

            match (key.as_str(), value) {
                ("typeMap", Bson::Document(map)) => {
                    for (type_name, collection) in map {
                        match collection {
                            Bson::String(name) => {
                                options.type_map.insert(type_name, name);
                            }
                            other => {
                                return Err(AdapterError::Initialization(format!(
                                    "typeMap entry {type_name} must be a string, got {other}"
                                )));
                            }
                        }
                    }
                }
                ("bufferEncoding", Bson::String(name)) => {
                    options.buffer_encoding = BufferEncoding::parse(&name)?;
                }
                ("convertTimestamps", Bson::Boolean(flag)) => {
                    options.convert_timestamps = flag;
                }
                ("nullUndefinedFields", Bson::Boolean(flag)) => {
                    options.null_undefined_fields = flag;
                }
                (key, other) => {
                    return Err(AdapterError::Initialization(format!(
                        "invalid value for adapter option {key}: {other}"
                    )));
                }
            }
        }

        Ok(options)
    }

    /// Maps a record-type name to its store collection name.
    pub fn collection<'a>(&'a self, type_name: &'a str) -> &'a str {
        self.type_map
            .get(type_name)
            .map(String::as_str)
            .unwrap_or(type_name)
    }

    pub fn type_map(mut self, type_name: impl Into<String>, collection: impl Into<String>) -> Self {
        self.type_map.insert(type_name.into(), collection.into());
        self
    }

    pub fn buffer_encoding(mut self, encoding: BufferEncoding) -> Self {
        self.buffer_encoding = encoding;
        self
    }

    pub fn convert_timestamps(mut self, flag: bool) -> Self {
        self.convert_timestamps = flag;
        self
    }

    pub fn null_undefined_fields(mut self, flag: bool) -> Self {
        self.null_undefined_fields = flag;
        self
    }
}

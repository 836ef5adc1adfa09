//! Error types and result types for adapter and store operations.
//!
//! This module provides error handling for the whole record-storage layer.
//! Use [`AdapterResult<T>`] as the return type for fallible operations.

use bson::error::Error as BsonError;
use thiserror::Error;

/// Represents all possible errors that can occur in the record-storage layer.
///
/// This enum covers conflicts on explicit-key creation, missing documents and
/// collections, schema lookup failures, and store-transport errors that are
/// propagated verbatim from the underlying document store.
#[derive(Error, Debug)]
pub enum AdapterError {
    /// A document with the given primary key already exists in the collection.
    /// The first argument is the document id, the second is the collection name.
    #[error("record {0} already exists in collection {1}")]
    Conflict(String, String),
    /// The requested document was not found in the collection.
    /// The first argument is the document id, the second is the collection name.
    #[error("record not found {0} in collection {1}")]
    NotFound(String, String),
    /// The requested collection does not exist in the store.
    #[error("collection not found: {0}")]
    CollectionNotFound(String),
    /// The record type is not declared in the schema.
    #[error("unknown record type: {0}")]
    UnknownType(String),
    /// A query option or update directive referenced a field the record type
    /// does not declare.
    #[error("unknown field {0} on record type {1}")]
    UnknownField(String, String),
    /// A value could not be coerced between its store and framework forms.
    #[error("coercion error: {0}")]
    Coercion(String),
    /// Serialization/deserialization error when converting document values.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// Error during store construction or connection setup.
    #[error("initialization error: {0}")]
    Initialization(String),
    /// An error occurred in the underlying document store, propagated as-is.
    #[error("store error: {0}")]
    Store(String),
}

/// A specialized `Result` type for record-storage operations.
///
/// This type alias is used throughout the workspace to indicate operations
/// that may fail with an [`AdapterError`].
pub type AdapterResult<T> = Result<T, AdapterError>;

impl From<BsonError> for AdapterError {
    fn from(err: BsonError) -> Self {
        AdapterError::Serialization(err.to_string())
    }
}

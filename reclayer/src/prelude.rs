//! Convenient re-exports of commonly used types from reclayer.
//!
//! Import this prelude module to quickly access the most frequently used
//! types and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use reclayer::prelude::*;
//! ```
//!
//! This provides access to:
//! - The adapter and its configuration
//! - Schema and record-type declarations
//! - Find options, update directives, and result types
//! - The store trait for implementing new backends
//! - Error types

pub use reclayer_core::{
    error::{AdapterError, AdapterResult},
    options::{FindOptions, Matcher, Records, Update},
    query::{NativeQuery, SortDirection, WhereOp},
    schema::{FieldDef, FieldKind, RecordType, Schema},
    store::{DocStore, DocStoreBuilder, Meta, SessionToken},
};

pub use reclayer_adapter::{Adapter, AdapterOptions, BufferEncoding};

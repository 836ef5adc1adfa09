//! Shared vocabulary for the reclayer record-storage adapter.
//!
//! This crate is the core of the reclayer project and provides:
//!
//! - **Record schema** ([`schema`]) - Read-only record type descriptors driving per-field dispatch
//! - **Store abstraction** ([`store`]) - The narrow capability trait onto the underlying document store
//! - **Native queries** ([`query`]) - The chained where/orderBy/limit/offset shape the store executes
//! - **Call options** ([`options`]) - Find options, update directives, and the records result shape
//! - **Timestamps** ([`timestamp`]) - The store-native `{seconds, nanoseconds}` pair
//! - **Error handling** ([`error`]) - Error types and result types
//!
//! # Example
//!
//! ```ignore
//! use reclayer_core::schema::{FieldDef, FieldKind, RecordType, Schema};
//!
//! let schema = Schema::new("id").record_type(
//!     "user",
//!     RecordType::new()
//!         .field("name", FieldDef::new(FieldKind::Text))
//!         .field("picture", FieldDef::new(FieldKind::Buffer))
//!         .field("friends", FieldDef::new(FieldKind::Integer).array()),
//! );
//! ```

#[allow(unused_extern_crates)]
extern crate self as reclayer_core;

pub mod error;
pub mod options;
pub mod query;
pub mod schema;
pub mod store;
pub mod timestamp;

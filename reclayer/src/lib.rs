//! Main reclayer crate providing a unified interface to the record-storage
//! adapter.
//!
//! This crate is the primary entry point for users of the reclayer stack. It
//! re-exports the core protocol types and the adapter implementation, plus
//! the in-memory store backend behind the `memory` feature.
//!
//! # Features
//!
//! - **Typed records over schemaless storage** - Declare record types once
//!   and let the adapter coerce values between framework and store forms
//! - **Narrow store interface** - Any backend implementing the `DocStore`
//!   trait plugs in; the adapter handles query translation and client-side
//!   re-filtering
//! - **Flexible find options** - Ranges, matches, sorting, existence checks,
//!   and pagination over a store that only speaks chained per-field filters
//!
//! # Quick Start
//!
//! ```ignore
//! use bson::doc;
//! use reclayer::{prelude::*, memory::MemoryStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let schema = Schema::new("id").record_type(
//!         "user",
//!         RecordType::new()
//!             .field("id", FieldDef::new(FieldKind::Text))
//!             .field("name", FieldDef::new(FieldKind::Text))
//!             .field("age", FieldDef::new(FieldKind::Integer)),
//!     );
//!
//!     let adapter = Adapter::connect(
//!         MemoryStore::builder(),
//!         schema,
//!         AdapterOptions::default(),
//!     )
//!     .await
//!     .unwrap();
//!
//!     adapter
//!         .create("user", vec![doc! { "id": "1", "name": "Alice", "age": 36 }], None)
//!         .await
//!         .unwrap();
//!
//!     let found = adapter
//!         .find(
//!             "user",
//!             None,
//!             &FindOptions::new().range("age", Some(30), Some(40)),
//!             None,
//!         )
//!         .await
//!         .unwrap();
//!
//!     println!("Found users: {:?}", found.records);
//!
//!     adapter.disconnect().await.unwrap();
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - Fast in-memory storage for development and testing
//!   (requires the default `memory` feature)

pub mod prelude;

pub use reclayer_core::{error, options, query, schema, store, timestamp};

pub use reclayer_adapter::{adapter, codec, config};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
#[cfg(feature = "memory")]
pub mod memory {
    pub use reclayer_memory::{MemoryStore, MemoryStoreBuilder};
}

//! In-memory document store for reclayer.
//!
//! This crate provides a thread-safe, in-memory implementation of the
//! `DocStore` capability trait. It is the store the adapter's test suite
//! runs against and a convenient stand-in during development.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using an async-aware RwLock
//! - **Native-shape storage** - Date values are held as `{seconds, nanoseconds}` pairs, like the real store
//! - **Query evaluation** - where/orderBy/limit/offset evaluated client-side over all documents
//!
//! # Quick Start
//!
//! ```ignore
//! use reclayer_memory::MemoryStore;
//! use reclayer_core::store::DocStore;
//! use bson::doc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MemoryStore::new();
//!     store.create("users", "1", doc! { "id": "1", "name": "Alice" }, None).await?;
//!
//!     let user = store.get("users", "1", None).await?;
//!     assert!(user.is_some());
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as reclayer_memory;

pub mod evaluator;
pub mod store;

pub use store::{MemoryStore, MemoryStoreBuilder};

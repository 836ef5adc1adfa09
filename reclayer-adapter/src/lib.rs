//! Adapter implementation translating typed CRUD onto a schemaless
//! document store.
//!
//! The store's query surface is narrow (chained per-field filters, no OR,
//! no positional array filters) and its value space diverges from the
//! framework's (text-encoded buffers, `{seconds, nanoseconds}` timestamp
//! pairs). This crate bridges both gaps: [`codec`] coerces values between
//! the two forms, [`translate`] maps find options onto native queries,
//! [`postfilter`] re-applies what the store could not evaluate, and
//! [`Adapter`] orchestrates the CRUD operations over any
//! [`DocStore`](reclayer_core::store::DocStore).

#[allow(unused_extern_crates)]
extern crate self as reclayer_adapter;

pub mod adapter;
pub mod codec;
pub mod config;
pub mod normalize;
pub mod postfilter;
pub mod translate;
pub(crate) mod value;

pub use adapter::Adapter;
pub use codec::RecordCodec;
pub use config::{AdapterOptions, BufferEncoding};

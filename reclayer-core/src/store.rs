//! The narrow capability interface onto the underlying document store.
//!
//! The adapter never talks to a store client directly; it goes through
//! [`DocStore`], which exposes exactly what the adapter needs: per-document
//! get/create/add/update/delete plus execution of a [`NativeQuery`]. The
//! real client's connection handling, retries, and timeouts all live behind
//! this trait, and store failures propagate through it unmodified.
//!
//! # Thread safety
//!
//! Implementations must be `Send + Sync`; the adapter issues per-item calls
//! concurrently within a single operation.

use async_trait::async_trait;
use bson::Document;
use std::fmt::Debug;
use uuid::Uuid;

use crate::{error::AdapterResult, query::NativeQuery};

/// An opaque session/transaction token minted by `begin_transaction` and
/// threaded through store calls. The store alone interprets it; this layer
/// neither locks nor detects conflicts with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionToken(Uuid);

impl SessionToken {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn id(&self) -> Uuid {
        self.0
    }
}

impl Default for SessionToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-call metadata passed alongside CRUD operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct Meta {
    /// Session token carried through to every store call of the operation.
    pub session: Option<SessionToken>,
}

impl Meta {
    pub fn with_session(session: SessionToken) -> Self {
        Self { session: Some(session) }
    }
}

/// Abstract interface for the underlying document store.
///
/// All methods are async and non-blocking; no timeout or retry policy is
/// imposed here. Errors are store-transport errors and reach the adapter's
/// caller verbatim.
#[async_trait]
pub trait DocStore: Send + Sync + Debug {
    /// Fetches one document by id. Returns `Ok(None)` when the document does
    /// not exist.
    async fn get(
        &self,
        collection: &str,
        id: &str,
        session: Option<&SessionToken>,
    ) -> AdapterResult<Option<Document>>;

    /// Creates a document at an explicit id, failing with
    /// [`AdapterError::Conflict`](crate::error::AdapterError::Conflict) when
    /// a document already exists there.
    async fn create(
        &self,
        collection: &str,
        id: &str,
        document: Document,
        session: Option<&SessionToken>,
    ) -> AdapterResult<()>;

    /// Adds a document under a store-generated id and returns that id.
    async fn add(
        &self,
        collection: &str,
        document: Document,
        session: Option<&SessionToken>,
    ) -> AdapterResult<String>;

    /// Merges the given fields into an existing document. Fails when the
    /// document does not exist.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        changes: Document,
        session: Option<&SessionToken>,
    ) -> AdapterResult<()>;

    /// Deletes one document by id. Fails when the document does not exist.
    async fn delete(
        &self,
        collection: &str,
        id: &str,
        session: Option<&SessionToken>,
    ) -> AdapterResult<()>;

    /// Executes a native query against a collection.
    async fn query(
        &self,
        collection: &str,
        query: NativeQuery,
        session: Option<&SessionToken>,
    ) -> AdapterResult<Vec<Document>>;

    /// Cleanly shuts down the store, releasing connections and caches.
    ///
    /// The default implementation is a no-op; clients holding external
    /// connections should override it.
    async fn shutdown(self) -> AdapterResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// Factory trait for constructing store instances.
///
/// `params` carries the adapter-configuration keys that were not recognized
/// as adapter options; they are forwarded here verbatim for the client's
/// constructor (credentials, endpoints, and the like).
#[async_trait]
pub trait DocStoreBuilder {
    type Store: DocStore;

    async fn build(self, params: Document) -> AdapterResult<Self::Store>;
}

//! The adapter: typed CRUD operations over an abstract document store.
//!
//! [`Adapter`] owns a [`DocStore`] implementation, the record [`Schema`],
//! and the resolved [`AdapterOptions`], and exposes the four protocol
//! operations (`find`, `create`, `update`, `delete`) plus a transaction
//! shim. Every operation runs its per-record store calls concurrently.

use bson::{Bson, Document};
use futures::future::{join_all, try_join_all};
use tracing::debug;

use reclayer_core::{
    error::{AdapterError, AdapterResult},
    options::{FindOptions, Records, Update},
    schema::{Schema, key_string},
    store::{DocStore, DocStoreBuilder, Meta, SessionToken},
};

use crate::{
    codec::RecordCodec,
    config::AdapterOptions,
    normalize,
    postfilter::post_filter,
    translate::translate,
    value::is_truthy,
};

/// A typed record adapter over one document store.
///
/// Construction goes through [`Adapter::connect`] (builds the store from the
/// configuration's pass-through parameters) or [`Adapter::new`] (wraps an
/// already-built store). Dropping the adapter without calling
/// [`Adapter::disconnect`] leaves connection cleanup to the store's own
/// `Drop`.
#[derive(Debug)]
pub struct Adapter<S: DocStore> {
    store: S,
    schema: Schema,
    config: AdapterOptions,
    codec: RecordCodec,
}

impl<S: DocStore> Adapter<S> {
    /// Builds the store through its factory and wraps it.
    ///
    /// Configuration keys not recognized as adapter options are forwarded to
    /// the builder verbatim.
    pub async fn connect<B>(
        builder: B,
        schema: Schema,
        config: AdapterOptions,
    ) -> AdapterResult<Self>
    where
        B: DocStoreBuilder<Store = S>,
    {
        let store = builder.build(config.store_params.clone()).await?;
        Ok(Self::new(store, schema, config))
    }

    /// Wraps an already-built store.
    pub fn new(store: S, schema: Schema, config: AdapterOptions) -> Self {
        let codec = RecordCodec::new(config.buffer_encoding, config.convert_timestamps);
        Self { store, schema, config, codec }
    }

    /// Shuts the store down, releasing its connections.
    pub async fn disconnect(self) -> AdapterResult<()> {
        self.store.shutdown().await
    }

    /// Starts a logical transaction and returns the metadata to thread
    /// through subsequent calls.
    ///
    /// The token is opaque to this layer; it performs no locking and no
    /// conflict detection of its own.
    pub fn begin_transaction(&self) -> Meta {
        Meta::with_session(SessionToken::new())
    }

    /// Ends a logical transaction. Nothing is buffered at this layer, so
    /// there is nothing to commit or roll back.
    pub async fn end_transaction(&self, _meta: Meta) -> AdapterResult<()> {
        Ok(())
    }

    /// Finds records of one type, either by explicit ids or by query
    /// options.
    ///
    /// With ids, documents are fetched individually and missing ids are
    /// silently dropped; an empty id list short-circuits to an empty result.
    /// Without ids, the options are translated to a native query and the
    /// deferred predicates are re-applied client-side after decoding.
    pub async fn find(
        &self,
        type_name: &str,
        ids: Option<Vec<Bson>>,
        options: &FindOptions,
        meta: Option<Meta>,
    ) -> AdapterResult<Records> {
        let record_type = self.schema.get(type_name)?;
        let collection = self.config.collection(type_name);
        let session = meta.and_then(|m| m.session);
        let session = session.as_ref();
        debug!(type_name, collection, "find");

        let documents = match ids {
            Some(ids) if ids.is_empty() => return Ok(Records::empty()),
            Some(ids) => {
                let gets = ids.iter().map(|id| async move {
                    self.store.get(collection, &key_string(id), session).await
                });
                try_join_all(gets).await?.into_iter().flatten().collect()
            }
            None => {
                let query = translate(type_name, options, &self.schema, &self.codec, &self.config)?;
                self.store.query(collection, query, session).await?
            }
        };

        let records = documents
            .into_iter()
            .map(|document| self.codec.decode(document, record_type))
            .collect::<AdapterResult<Vec<_>>>()?;

        post_filter(records, type_name, options, &self.schema)
    }

    /// Creates the given records and returns them as stored, decoded back to
    /// framework-native values.
    ///
    /// A record carrying a non-empty primary key is created at that id and
    /// conflicts when the id is taken. Otherwise the store generates an id,
    /// which is then written back into the document body.
    pub async fn create(
        &self,
        type_name: &str,
        records: Vec<Document>,
        meta: Option<Meta>,
    ) -> AdapterResult<Records> {
        if records.is_empty() {
            return Ok(Records::empty());
        }
        let record_type = self.schema.get(type_name)?;
        let collection = self.config.collection(type_name);
        let primary_key = self.schema.primary_key();
        let session = meta.and_then(|m| m.session);
        let session = session.as_ref();
        debug!(type_name, collection, count = records.len(), "create");

        let creates = records.into_iter().map(|record| async move {
            let mut document = self.codec.encode(record, record_type)?;
            if self.config.null_undefined_fields {
                normalize::null_undefined_fields(&mut document, record_type);
            }

            let id = match document.get(primary_key) {
                Some(value) if is_truthy(value) => {
                    let id = key_string(value);
                    self.store
                        .create(collection, &id, document, session)
                        .await?;
                    id
                }
                _ => {
                    let id = self.store.add(collection, document, session).await?;
                    let mut id_field = Document::new();
                    id_field.insert(primary_key, id.as_str());
                    self.store.update(collection, &id, id_field, session).await?;
                    id
                }
            };

            let stored = self
                .store
                .get(collection, &id, session)
                .await?
                .ok_or_else(|| AdapterError::NotFound(id, collection.to_string()))?;
            self.codec.decode(stored, record_type)
        });

        let created = try_join_all(creates).await?;
        Ok(Records::new(created))
    }

    /// Applies the given update directives and returns how many records were
    /// actually updated.
    ///
    /// A directive targeting a missing record, or one whose store write
    /// fails, contributes zero to the count rather than failing the batch.
    pub async fn update(
        &self,
        type_name: &str,
        updates: Vec<Update>,
        meta: Option<Meta>,
    ) -> AdapterResult<usize> {
        if updates.is_empty() {
            return Ok(0);
        }
        let record_type = self.schema.get(type_name)?;
        let collection = self.config.collection(type_name);
        let session = meta.and_then(|m| m.session);
        let session = session.as_ref();
        debug!(type_name, collection, count = updates.len(), "update");

        let applies = updates.into_iter().map(|update| async move {
            let applied: AdapterResult<()> = async {
                let id = key_string(&update.id);
                let mut changes = update.replace.clone();

                if update.needs_read() {
                    let current = self
                        .store
                        .get(collection, &id, session)
                        .await?
                        .ok_or_else(|| {
                            AdapterError::NotFound(id.clone(), collection.to_string())
                        })?;
                    // Merge in framework form: the fetched document holds
                    // store-encoded values, the directive's values do not.
                    let current = self.codec.decode(current, record_type)?;

                    for (field, value) in &update.push {
                        let mut items = existing_array(&current, field);
                        match value {
                            Bson::Array(more) => items.extend(more.iter().cloned()),
                            other => items.push(other.clone()),
                        }
                        changes.insert(field.clone(), Bson::Array(items));
                    }
                    for (field, value) in &update.pull {
                        let removed = match value {
                            Bson::Array(values) => values.clone(),
                            other => vec![other.clone()],
                        };
                        // A pull compounds with a push or replace on the
                        // same field rather than clobbering it.
                        let mut items = match changes.get(field) {
                            Some(Bson::Array(items)) => items.clone(),
                            _ => existing_array(&current, field),
                        };
                        items.retain(|item| !removed.contains(item));
                        changes.insert(field.clone(), Bson::Array(items));
                    }
                }

                let changes = self.codec.encode(changes, record_type)?;
                self.store.update(collection, &id, changes, session).await
            }
            .await;

            match applied {
                Ok(()) => 1_usize,
                Err(error) => {
                    debug!(%error, "update directive dropped");
                    0
                }
            }
        });

        Ok(join_all(applies).await.into_iter().sum())
    }

    /// Deletes records by id and returns how many existed and were removed.
    ///
    /// Ids that resolve to no document, or whose removal fails, contribute
    /// zero to the count rather than failing the batch. An absent id list
    /// deletes nothing.
    pub async fn delete(
        &self,
        type_name: &str,
        ids: Option<Vec<Bson>>,
        meta: Option<Meta>,
    ) -> AdapterResult<usize> {
        let Some(ids) = ids else { return Ok(0) };
        if ids.is_empty() {
            return Ok(0);
        }
        self.schema.get(type_name)?;
        let collection = self.config.collection(type_name);
        let session = meta.and_then(|m| m.session);
        let session = session.as_ref();
        debug!(type_name, collection, count = ids.len(), "delete");

        let deletes = ids.iter().map(|id| async move {
            let removed: AdapterResult<bool> = async {
                let id = key_string(id);
                match self.store.get(collection, &id, session).await? {
                    Some(_) => {
                        self.store.delete(collection, &id, session).await?;
                        Ok(true)
                    }
                    None => Ok(false),
                }
            }
            .await;

            match removed {
                Ok(true) => 1_usize,
                Ok(false) => 0,
                Err(error) => {
                    debug!(%error, "delete dropped");
                    0
                }
            }
        });

        Ok(join_all(deletes).await.into_iter().sum())
    }
}

fn existing_array(document: &Document, field: &str) -> Vec<Bson> {
    match document.get(field) {
        Some(Bson::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

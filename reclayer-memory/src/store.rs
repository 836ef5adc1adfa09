//! In-memory document store implementation.
//!
//! A simple store that keeps documents in HashMaps behind an async-aware
//! read-write lock and evaluates native queries client-side. Date values are
//! ingested into the store-native `{seconds, nanoseconds}` pair form on
//! write, the same shape the real document store hands back on read.

use async_trait::async_trait;
use bson::{Bson, Document};
use mea::rwlock::RwLock;
use std::{cmp::Ordering, collections::HashMap, sync::Arc};
use uuid::Uuid;

use reclayer_core::{
    error::{AdapterError, AdapterResult},
    query::{NativeQuery, SortDirection},
    store::{DocStore, DocStoreBuilder, SessionToken},
    timestamp::Timestamp,
};

use crate::evaluator::{compare_field, matches_clause};

type CollectionMap = HashMap<String, Document>;
type StoreMap = HashMap<String, CollectionMap>;

/// Thread-safe in-memory document store.
///
/// `MemoryStore` is cloneable and shares its state through an `Arc`; clones
/// see the same data. Queries scan every document in a collection, which is
/// fine for the development and test workloads this store targets.
///
/// Session tokens are accepted and ignored: there is no isolation to
/// delegate to here.
#[derive(Default, Clone, Debug)]
pub struct MemoryStore {
    /// collection name -> (document id -> document)
    store: Arc<RwLock<StoreMap>>,
}

impl MemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for use with the adapter's connect path.
    pub fn builder() -> MemoryStoreBuilder {
        MemoryStoreBuilder::default()
    }
}

/// Recursively converts date values into the store-native pair form,
/// mirroring how the real store ingests natively-typed writes.
fn ingest(value: &Bson) -> Bson {
    match value {
        Bson::DateTime(datetime) => Timestamp::from_datetime(*datetime).into(),
        Bson::Array(arr) => Bson::Array(arr.iter().map(ingest).collect()),
        Bson::Document(doc) => Bson::Document(ingest_document(doc)),
        _ => value.clone(),
    }
}

fn ingest_document(document: &Document) -> Document {
    document
        .iter()
        .map(|(k, v)| (k.clone(), ingest(v)))
        .collect()
}

#[async_trait]
impl DocStore for MemoryStore {
    async fn get(
        &self,
        collection: &str,
        id: &str,
        _session: Option<&SessionToken>,
    ) -> AdapterResult<Option<Document>> {
        let store = self.store.read().await;

        Ok(store
            .get(collection)
            .and_then(|col| col.get(id))
            .cloned())
    }

    async fn create(
        &self,
        collection: &str,
        id: &str,
        document: Document,
        _session: Option<&SessionToken>,
    ) -> AdapterResult<()> {
        let mut store = self.store.write().await;
        let collection_map = store
            .entry(collection.to_string())
            .or_default();

        if collection_map.contains_key(id) {
            return Err(AdapterError::Conflict(id.to_string(), collection.to_string()));
        }

        collection_map.insert(id.to_string(), ingest_document(&document));

        Ok(())
    }

    async fn add(
        &self,
        collection: &str,
        document: Document,
        _session: Option<&SessionToken>,
    ) -> AdapterResult<String> {
        let mut store = self.store.write().await;
        let collection_map = store
            .entry(collection.to_string())
            .or_default();

        let id = Uuid::new_v4().simple().to_string();
        collection_map.insert(id.clone(), ingest_document(&document));

        Ok(id)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        changes: Document,
        _session: Option<&SessionToken>,
    ) -> AdapterResult<()> {
        let mut store = self.store.write().await;
        let collection_map = match store.get_mut(collection) {
            Some(col) => col,
            None => return Err(AdapterError::CollectionNotFound(collection.to_string())),
        };

        let document = match collection_map.get_mut(id) {
            Some(doc) => doc,
            None => {
                return Err(AdapterError::NotFound(id.to_string(), collection.to_string()));
            }
        };

        for (field, value) in ingest_document(&changes) {
            document.insert(field, value);
        }

        Ok(())
    }

    async fn delete(
        &self,
        collection: &str,
        id: &str,
        _session: Option<&SessionToken>,
    ) -> AdapterResult<()> {
        let mut store = self.store.write().await;
        let collection_map = match store.get_mut(collection) {
            Some(col) => col,
            None => return Err(AdapterError::CollectionNotFound(collection.to_string())),
        };

        if collection_map.remove(id).is_none() {
            return Err(AdapterError::NotFound(id.to_string(), collection.to_string()));
        }

        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        query: NativeQuery,
        _session: Option<&SessionToken>,
    ) -> AdapterResult<Vec<Document>> {
        let store = self.store.read().await;
        let collection_map = match store.get(collection) {
            Some(col) => col,
            None => return Ok(vec![]),
        };

        let mut documents = collection_map
            .values()
            .filter(|doc| {
                query
                    .clauses
                    .iter()
                    .all(|clause| matches_clause(doc, clause))
            })
            .cloned()
            .collect::<Vec<_>>();

        if !query.order_by.is_empty() {
            documents.sort_by(|a, b| {
                for order in &query.order_by {
                    let ordering = match order.direction {
                        SortDirection::Asc => compare_field(a, b, &order.field),
                        SortDirection::Desc => compare_field(b, a, &order.field),
                    };

                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                }

                Ordering::Equal
            });
        }

        Ok(documents
            .into_iter()
            .skip(query.offset.unwrap_or(0))
            .take(query.limit.unwrap_or(usize::MAX))
            .collect())
    }
}

/// Builder for [`MemoryStore`] instances. Pass-through store parameters are
/// accepted and ignored since there is nothing to connect to.
#[derive(Default)]
pub struct MemoryStoreBuilder;

#[async_trait]
impl DocStoreBuilder for MemoryStoreBuilder {
    type Store = MemoryStore;

    async fn build(self, _params: Document) -> AdapterResult<Self::Store> {
        Ok(MemoryStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    use reclayer_core::query::WhereOp;

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let store = MemoryStore::new();

        store
            .create("users", "1", doc! { "id": "1", "name": "a" }, None)
            .await
            .unwrap();

        let found = store.get("users", "1", None).await.unwrap().unwrap();
        assert_eq!(found.get_str("name").unwrap(), "a");
        assert!(store.get("users", "2", None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_at_taken_id_conflicts() {
        let store = MemoryStore::new();

        store.create("users", "1", doc! {}, None).await.unwrap();
        let err = store
            .create("users", "1", doc! {}, None)
            .await
            .unwrap_err();

        assert!(matches!(err, AdapterError::Conflict(_, _)));
    }

    #[tokio::test]
    async fn add_generates_distinct_ids() {
        let store = MemoryStore::new();

        let a = store.add("users", doc! {}, None).await.unwrap();
        let b = store.add("users", doc! {}, None).await.unwrap();

        assert_ne!(a, b);
        assert!(store.get("users", &a, None).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn update_merges_fields() {
        let store = MemoryStore::new();

        store
            .create("users", "1", doc! { "name": "a", "age": 36 }, None)
            .await
            .unwrap();
        store
            .update("users", "1", doc! { "age": 37 }, None)
            .await
            .unwrap();

        let found = store.get("users", "1", None).await.unwrap().unwrap();
        assert_eq!(found.get_str("name").unwrap(), "a");
        assert_eq!(found.get_i32("age").unwrap(), 37);
    }

    #[tokio::test]
    async fn update_of_missing_document_fails() {
        let store = MemoryStore::new();
        store.create("users", "1", doc! {}, None).await.unwrap();

        assert!(matches!(
            store.update("users", "2", doc! {}, None).await,
            Err(AdapterError::NotFound(_, _))
        ));
        assert!(matches!(
            store.update("pets", "1", doc! {}, None).await,
            Err(AdapterError::CollectionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn dates_are_stored_as_pairs() {
        let store = MemoryStore::new();
        let date = bson::DateTime::from_millis(1_000_500);

        store
            .create("users", "1", doc! { "birthday": date }, None)
            .await
            .unwrap();

        let found = store.get("users", "1", None).await.unwrap().unwrap();
        let pair = Timestamp::from_bson(found.get("birthday").unwrap()).unwrap();
        assert_eq!(pair.seconds, 1_000);
        assert_eq!(pair.nanoseconds, 500_000_000);
    }

    #[tokio::test]
    async fn query_filters_sorts_and_paginates() {
        let store = MemoryStore::new();

        for (id, age) in [("1", 42), ("2", 36), ("3", 28)] {
            store
                .create("users", id, doc! { "id": id, "age": age }, None)
                .await
                .unwrap();
        }

        let query = NativeQuery::new()
            .filter("age", WhereOp::Gte, 30)
            .order_by("age", SortDirection::Asc);
        let results = store.query("users", query, None).await.unwrap();
        let ages = results
            .iter()
            .map(|doc| doc.get_i32("age").unwrap())
            .collect::<Vec<_>>();
        assert_eq!(ages, vec![36, 42]);

        let query = NativeQuery::new()
            .order_by("age", SortDirection::Desc)
            .limit(1)
            .offset(1);
        let results = store.query("users", query, None).await.unwrap();
        assert_eq!(results[0].get_i32("age").unwrap(), 36);

        let none = store
            .query("pets", NativeQuery::new(), None)
            .await
            .unwrap();
        assert!(none.is_empty());
    }
}

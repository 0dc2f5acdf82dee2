// src/store/memory.rs

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};

use super::{Document, DocumentStore, StoreError, StoreResult, contains};

/// In-process store with the same semantics as the Postgres backend.
/// Used by the `memory` backend and the test suite.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<(String, Document)>>>,
    counters: Mutex<HashMap<String, i64>>,
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn find_many(&self, collection: &str, filter: &Value) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|(_, document)| contains(document, filter))
                    .map(|(_, document)| document.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert(&self, collection: &str, id: &str, document: Document) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();

        if documents.iter().any(|(existing, _)| existing == id) {
            return Err(StoreError::Duplicate {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }

        documents.push((id.to_string(), document));
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        filter: &Value,
        document: Document,
    ) -> StoreResult<u64> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(0);
        };

        let mut updated = 0;
        for (id, existing) in documents.iter_mut() {
            if contains(existing, filter) {
                let mut replacement = document.clone();
                if let Some(object) = replacement.as_object_mut() {
                    object.insert("_id".to_string(), Value::String(id.clone()));
                }
                *existing = replacement;
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn remove(&self, collection: &str, filter: &Value) -> StoreResult<u64> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(0);
        };

        let before = documents.len();
        documents.retain(|(_, document)| !contains(document, filter));
        Ok((before - documents.len()) as u64)
    }

    async fn increment_counter(&self, name: &str) -> StoreResult<i64> {
        let mut counters = self.counters.lock().await;
        let value = counters.entry(name.to_string()).or_insert(0);
        *value += 1;
        Ok(*value)
    }

    async fn counter_value(&self, name: &str) -> StoreResult<i64> {
        Ok(self.counters.lock().await.get(name).copied().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn duplicate_key_is_rejected() {
        let store = MemoryDocumentStore::default();
        store
            .insert("c", "k", json!({"_id": "k"}))
            .await
            .unwrap();

        let err = store.insert("c", "k", json!({"_id": "k"})).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn update_keeps_id_and_remove_counts() {
        let store = MemoryDocumentStore::default();
        store
            .insert("c", "a", json!({"_id": "a", "testID": "T-000001", "v": 1}))
            .await
            .unwrap();

        let updated = store
            .update("c", &json!({"testID": "T-000001"}), json!({"testID": "T-000001", "v": 2}))
            .await
            .unwrap();
        assert_eq!(updated, 1);

        let found = store.find_one("c", &json!({"v": 2})).await.unwrap().unwrap();
        assert_eq!(found["_id"], "a");

        assert_eq!(store.remove("c", &json!({"v": 2})).await.unwrap(), 1);
        assert_eq!(store.remove("c", &json!({"v": 2})).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn counters_are_monotonic_under_concurrency() {
        let store = Arc::new(MemoryDocumentStore::default());

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.increment_counter("testID").await.unwrap() })
            })
            .collect();

        let mut values = Vec::new();
        for handle in handles {
            values.push(handle.await.unwrap());
        }
        values.sort();

        assert_eq!(values, (1..=32).collect::<Vec<i64>>());
        assert_eq!(store.counter_value("testID").await.unwrap(), 32);
        assert_eq!(store.counter_value("other").await.unwrap(), 0);
    }
}

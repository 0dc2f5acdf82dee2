// src/store/database.rs

use std::sync::Arc;

use serde_json::{Value, json};

use super::{Collection, Document, DocumentStore, StoreError, StoreResult};
use crate::models::subject::Subject;

/// Process-wide persistence handle, built once at startup and cloned into
/// every handler through `AppState`.
#[derive(Clone)]
pub struct Database {
    store: Arc<dyn DocumentStore>,
    name: Arc<str>,
}

impl Database {
    pub fn new(store: Arc<dyn DocumentStore>, name: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            name: name.into(),
        }
    }

    fn resolve(&self, collection: Collection) -> String {
        collection.name(&self.name)
    }

    pub async fn find_one(
        &self,
        collection: Collection,
        filter: Value,
    ) -> StoreResult<Option<Document>> {
        self.store.find_one(&self.resolve(collection), &filter).await
    }

    pub async fn find_many(&self, collection: Collection, filter: Value) -> StoreResult<Vec<Document>> {
        self.store.find_many(&self.resolve(collection), &filter).await
    }

    pub async fn find_by_id(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
        self.find_one(collection, json!({ "_id": id })).await
    }

    /// Inserts a document, minting a UUID `_id` when it has none. Returns the `_id`.
    pub async fn insert(&self, collection: Collection, mut document: Document) -> StoreResult<String> {
        let object = document
            .as_object_mut()
            .ok_or_else(|| StoreError::Malformed("documents must be JSON objects".to_string()))?;

        let id = match object.get("_id").and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => {
                let id = uuid::Uuid::new_v4().simple().to_string();
                object.insert("_id".to_string(), Value::String(id.clone()));
                id
            }
        };

        self.store
            .insert(&self.resolve(collection), &id, document)
            .await?;
        Ok(id)
    }

    pub async fn update(
        &self,
        collection: Collection,
        filter: Value,
        document: Document,
    ) -> StoreResult<u64> {
        if !document.is_object() {
            return Err(StoreError::Malformed("documents must be JSON objects".to_string()));
        }
        self.store
            .update(&self.resolve(collection), &filter, document)
            .await
    }

    pub async fn remove(&self, collection: Collection, filter: Value) -> StoreResult<u64> {
        self.store.remove(&self.resolve(collection), &filter).await
    }

    pub async fn increment_counter(&self, name: &str) -> StoreResult<i64> {
        self.store.increment_counter(name).await
    }

    pub async fn counter_value(&self, name: &str) -> StoreResult<i64> {
        self.store.counter_value(name).await
    }

    /// Looks up which subject partition holds `test_id`.
    pub async fn test_subject(&self, test_id: &str) -> StoreResult<Option<Subject>> {
        let entry = self.find_by_id(Collection::TestList, test_id).await?;

        Ok(entry
            .as_ref()
            .and_then(|entry| entry.get("course"))
            .and_then(Value::as_str)
            .and_then(|course| course.parse().ok()))
    }
}

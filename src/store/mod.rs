// src/store/mod.rs

//! Document persistence.
//!
//! Everything the server keeps is a JSON document living in a named collection.
//! `DocumentStore` is the backend contract; `Database` is the façade the rest
//! of the crate talks to, resolving logical collections to names.

pub mod collection;
pub mod database;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde_json::Value;

pub use collection::Collection;
pub use database::Database;
pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

/// A stored JSON object. Always carries its key under `_id`.
pub type Document = Value;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("document '{id}' already exists in {collection}")]
    Duplicate { collection: String, id: String },

    #[error("malformed document: {0}")]
    Malformed(String),
}

/// Backend contract for collection-oriented JSON storage.
///
/// Filters are JSON objects matched by containment (see [`contains`]).
/// Results come back in insertion order.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_many(&self, collection: &str, filter: &Value) -> StoreResult<Vec<Document>>;

    async fn find_one(&self, collection: &str, filter: &Value) -> StoreResult<Option<Document>> {
        Ok(self.find_many(collection, filter).await?.into_iter().next())
    }

    /// Inserts `document` under `id`. Fails with `Duplicate` when the key is taken.
    async fn insert(&self, collection: &str, id: &str, document: Document) -> StoreResult<()>;

    /// Replaces every matching document, keeping its `_id`. Returns the match count.
    async fn update(&self, collection: &str, filter: &Value, document: Document)
    -> StoreResult<u64>;

    /// Deletes every matching document. Returns the number removed.
    async fn remove(&self, collection: &str, filter: &Value) -> StoreResult<u64>;

    /// Atomically increments the named counter and returns the new value.
    async fn increment_counter(&self, name: &str) -> StoreResult<i64>;

    /// Current value of the named counter, 0 if it was never incremented.
    async fn counter_value(&self, name: &str) -> StoreResult<i64>;
}

/// JSON containment, following Postgres `jsonb @>` semantics.
///
/// Objects match when every key of `filter` is contained in `document`,
/// arrays when every filter element is contained by some document element,
/// scalars by equality.
pub fn contains(document: &Value, filter: &Value) -> bool {
    match (document, filter) {
        (Value::Object(doc), Value::Object(want)) => want
            .iter()
            .all(|(key, value)| doc.get(key).is_some_and(|found| contains(found, value))),
        (Value::Array(doc), Value::Array(want)) => want
            .iter()
            .all(|value| doc.iter().any(|found| contains(found, value))),
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (a, b) => a == b,
    }
}

// src/store/postgres.rs

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, types::Json};

use super::{Document, DocumentStore, StoreError, StoreResult};

/// Postgres backend. Every collection shares the `documents` table and is
/// queried through JSONB containment; counters live in their own table.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn find_many(&self, collection: &str, filter: &Value) -> StoreResult<Vec<Document>> {
        let rows: Vec<Json<Value>> = sqlx::query_scalar(
            r#"
            SELECT body
            FROM documents
            WHERE collection = $1 AND body @> $2
            ORDER BY seq
            "#,
        )
        .bind(collection)
        .bind(Json(filter))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|Json(body)| body).collect())
    }

    async fn find_one(&self, collection: &str, filter: &Value) -> StoreResult<Option<Document>> {
        let row: Option<Json<Value>> = sqlx::query_scalar(
            r#"
            SELECT body
            FROM documents
            WHERE collection = $1 AND body @> $2
            ORDER BY seq
            LIMIT 1
            "#,
        )
        .bind(collection)
        .bind(Json(filter))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|Json(body)| body))
    }

    async fn insert(&self, collection: &str, id: &str, document: Document) -> StoreResult<()> {
        sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(id)
            .bind(Json(&document))
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => StoreError::Duplicate {
                    collection: collection.to_string(),
                    id: id.to_string(),
                },
                other => StoreError::Database(other),
            })?;
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        filter: &Value,
        document: Document,
    ) -> StoreResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET body = $3 || jsonb_build_object('_id', id)
            WHERE collection = $1 AND body @> $2
            "#,
        )
        .bind(collection)
        .bind(Json(filter))
        .bind(Json(&document))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn remove(&self, collection: &str, filter: &Value) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND body @> $2")
            .bind(collection)
            .bind(Json(filter))
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn increment_counter(&self, name: &str) -> StoreResult<i64> {
        let value: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO counters (name, value)
            VALUES ($1, 1)
            ON CONFLICT (name) DO UPDATE SET value = counters.value + 1
            RETURNING value
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(value)
    }

    async fn counter_value(&self, name: &str) -> StoreResult<i64> {
        let value: Option<i64> = sqlx::query_scalar("SELECT value FROM counters WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value.unwrap_or(0))
    }
}

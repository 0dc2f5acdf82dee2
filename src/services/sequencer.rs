// src/services/sequencer.rs

//! Test ID minting.
//!
//! IDs come from an atomic counter owned by the store, so two concurrent
//! callers can never be handed the same ID. Creation accepts any ID that was
//! minted and not yet used; reuse is caught by the test index primary key.

use crate::{
    models::test::TestId,
    store::{Database, StoreResult},
};

pub const TEST_ID_COUNTER: &str = "testID";

/// Reserves and returns the next test ID.
pub async fn reserve(db: &Database) -> StoreResult<TestId> {
    let sequence = db.increment_counter(TEST_ID_COUNTER).await?;
    Ok(TestId::new(sequence.max(0) as u64))
}

/// Whether `id` has been handed out by [`reserve`].
pub async fn is_minted(db: &Database, id: TestId) -> StoreResult<bool> {
    let current = db.counter_value(TEST_ID_COUNTER).await?;
    Ok(current > 0 && id.sequence() <= current as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDocumentStore;
    use std::sync::Arc;

    fn database() -> Database {
        Database::new(Arc::new(MemoryDocumentStore::default()), "VianuEdu")
    }

    #[tokio::test]
    async fn reserves_sequential_ids() {
        let db = database();
        assert_eq!(reserve(&db).await.unwrap().to_string(), "T-000001");
        assert_eq!(reserve(&db).await.unwrap().to_string(), "T-000002");
    }

    #[tokio::test]
    async fn only_reserved_ids_are_minted() {
        let db = database();
        assert!(!is_minted(&db, TestId::new(1)).await.unwrap());

        let id = reserve(&db).await.unwrap();
        assert!(is_minted(&db, id).await.unwrap());
        assert!(!is_minted(&db, TestId::new(2)).await.unwrap());
    }

    #[tokio::test]
    async fn concurrent_reservations_never_collide() {
        let db = database();
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let db = db.clone();
                tokio::spawn(async move { reserve(&db).await.unwrap() })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 16);
    }
}

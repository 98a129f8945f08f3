use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::NormalizedResume;
use crate::store::{not_found, RecordId, RecordStore};

/// Process-local store. Backs tests and runs without a database.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<RecordId, NormalizedResume>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn save(&self, record: &NormalizedResume) -> Result<RecordId, AppError> {
        let id = Uuid::new_v4();
        self.records.write().await.insert(id, record.clone());
        Ok(id)
    }

    async fn load(&self, id: RecordId) -> Result<NormalizedResume, AppError> {
        self.records
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_then_load_returns_same_record() {
        let store = InMemoryRecordStore::new();
        let mut record = NormalizedResume::default();
        record.contact_info.name = "Jane Doe".into();

        let id = store.save(&record).await.unwrap();
        assert_eq!(store.load(id).await.unwrap(), record);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_each_save_gets_a_fresh_id() {
        let store = InMemoryRecordStore::new();
        let record = NormalizedResume::default();
        let a = store.save(&record).await.unwrap();
        let b = store.save(&record).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_load_unknown_id_is_not_found() {
        let store = InMemoryRecordStore::new();
        let err = store.load(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}

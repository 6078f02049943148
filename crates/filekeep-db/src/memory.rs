//! In-memory metadata repository for tests and local development.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use filekeep_core::{AppError, FileRecord};
use tokio::sync::RwLock;

use crate::repository::FileRecordRepository;

/// Metadata repository keeping records in process memory.
#[derive(Clone, Default)]
pub struct MemoryFileRecordRepository {
    records: Arc<RwLock<HashMap<String, FileRecord>>>,
}

impl MemoryFileRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FileRecordRepository for MemoryFileRecordRepository {
    async fn save(&self, record: &FileRecord) -> Result<(), AppError> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.public_id) {
            return Err(AppError::Internal(format!(
                "Duplicate public id: {}",
                record.public_id
            )));
        }
        records.insert(record.public_id.clone(), record.clone());
        Ok(())
    }

    async fn find_by_id(&self, public_id: &str) -> Result<Option<FileRecord>, AppError> {
        Ok(self.records.read().await.get(public_id).cloned())
    }

    async fn delete_by_id(&self, public_id: &str) -> Result<bool, AppError> {
        Ok(self.records.write().await.remove(public_id).is_some())
    }

    async fn exists(&self, public_id: &str) -> Result<bool, AppError> {
        Ok(self.records.read().await.contains_key(public_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use filekeep_core::FileKind;

    fn record(public_id: &str) -> FileRecord {
        FileRecord {
            public_id: public_id.to_string(),
            original_filename: "photo.png".to_string(),
            stored_filename: format!("{}.png", public_id),
            content_type: "image/png".to_string(),
            size: 42,
            kind: FileKind::Image,
            folder: None,
            uploaded_at: Utc::now(),
            url: format!("https://localhost:7000/api/files/{}", public_id),
        }
    }

    #[tokio::test]
    async fn test_save_find_delete() {
        let repo = MemoryFileRecordRepository::new();

        repo.save(&record("a1b2c3d4e5f6")).await.unwrap();
        assert!(repo.exists("a1b2c3d4e5f6").await.unwrap());

        let found = repo.find_by_id("a1b2c3d4e5f6").await.unwrap().unwrap();
        assert_eq!(found.stored_filename, "a1b2c3d4e5f6.png");

        assert!(repo.delete_by_id("a1b2c3d4e5f6").await.unwrap());
        assert!(!repo.exists("a1b2c3d4e5f6").await.unwrap());
        assert!(repo.find_by_id("a1b2c3d4e5f6").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_id_is_absent_not_error() {
        let repo = MemoryFileRecordRepository::new();
        assert!(repo.find_by_id("nope").await.unwrap().is_none());
        assert!(!repo.delete_by_id("nope").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_save_is_rejected() {
        let repo = MemoryFileRecordRepository::new();
        repo.save(&record("a1b2c3d4e5f6")).await.unwrap();
        assert!(repo.save(&record("a1b2c3d4e5f6")).await.is_err());
    }
}

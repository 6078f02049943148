//! Metadata repository abstraction.

use async_trait::async_trait;
use filekeep_core::{AppError, FileRecord};

/// Persistence interface for file metadata records.
///
/// `save` is insert-only: public ids are never reused, so a duplicate id
/// is a caller bug surfaced as an error. Lookups of unknown ids return
/// `Ok(None)` rather than an error.
#[async_trait]
pub trait FileRecordRepository: Send + Sync {
    /// Insert a new record.
    async fn save(&self, record: &FileRecord) -> Result<(), AppError>;

    /// Fetch the record with the given public id.
    async fn find_by_id(&self, public_id: &str) -> Result<Option<FileRecord>, AppError>;

    /// Delete the record with the given public id. Returns whether a
    /// record existed.
    async fn delete_by_id(&self, public_id: &str) -> Result<bool, AppError>;

    /// Whether a record with the given public id exists.
    async fn exists(&self, public_id: &str) -> Result<bool, AppError>;
}

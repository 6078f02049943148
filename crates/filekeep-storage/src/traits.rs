//! Content store abstraction trait
//!
//! This module defines the trait that all content store backends must
//! implement.

use async_trait::async_trait;
use filekeep_core::AppError;
use thiserror::Error;

/// Content store operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid storage name: {0}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err.to_string())
    }
}

/// Result type for content store operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Content store abstraction
///
/// Stores raw bytes under generated names within optional folder scopes.
/// `folder: None` addresses the root storage area. Reads of a missing
/// name return `Ok(None)`; deletes of a missing name succeed. Writes to
/// distinct names never interfere.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Write bytes under the given name, creating the folder on first use.
    ///
    /// The bytes are durable (flushed to the backing medium) when this
    /// returns `Ok`.
    async fn put(&self, folder: Option<&str>, filename: &str, data: Vec<u8>) -> StorageResult<()>;

    /// Read the bytes stored under the given name.
    async fn get(&self, folder: Option<&str>, filename: &str)
        -> StorageResult<Option<Vec<u8>>>;

    /// Remove the bytes stored under the given name.
    async fn delete(&self, folder: Option<&str>, filename: &str) -> StorageResult<()>;
}

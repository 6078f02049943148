use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::traits::{ContentStore, StorageError, StorageResult};

/// Local filesystem content store
#[derive(Clone)]
pub struct LocalContentStore {
    base_path: PathBuf,
}

impl LocalContentStore {
    /// Create a new LocalContentStore instance rooted at `base_path`,
    /// creating the directory if needed.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalContentStore { base_path })
    }

    /// Root directory of this store.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve folder + filename to a filesystem path with security
    /// validation.
    ///
    /// Rejects components containing path traversal sequences, so callers
    /// cannot address files outside the storage root.
    fn resolve_path(&self, folder: Option<&str>, filename: &str) -> StorageResult<PathBuf> {
        for component in folder.iter().copied().chain(std::iter::once(filename)) {
            if component.contains("..")
                || component.contains('\\')
                || component.starts_with('/')
            {
                return Err(StorageError::InvalidName(format!(
                    "{:?} contains invalid characters",
                    component
                )));
            }
        }

        let mut path = self.base_path.clone();
        if let Some(folder) = folder {
            if !folder.is_empty() {
                path.push(folder);
            }
        }
        path.push(filename);
        Ok(path)
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ContentStore for LocalContentStore {
    async fn put(&self, folder: Option<&str>, filename: &str, data: Vec<u8>) -> StorageResult<()> {
        let path = self.resolve_path(folder, filename)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Content store write successful"
        );

        Ok(())
    }

    async fn get(
        &self,
        folder: Option<&str>,
        filename: &str,
    ) -> StorageResult<Option<Vec<u8>>> {
        let path = self.resolve_path(folder, filename)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(None);
        }

        let start = std::time::Instant::now();

        let data = fs::read(&path).await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        tracing::debug!(
            path = %path.display(),
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Content store read successful"
        );

        Ok(Some(data))
    }

    async fn delete(&self, folder: Option<&str>, filename: &str) -> StorageResult<()> {
        let path = self.resolve_path(folder, filename)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(path = %path.display(), "Content store delete successful");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let dir = tempdir().unwrap();
        let store = LocalContentStore::new(dir.path()).await.unwrap();

        let data = b"test data".to_vec();
        store.put(None, "abc123.txt", data.clone()).await.unwrap();

        let read_back = store.get(None, "abc123.txt").await.unwrap();
        assert_eq!(read_back, Some(data));
    }

    #[tokio::test]
    async fn test_put_creates_folder() {
        let dir = tempdir().unwrap();
        let store = LocalContentStore::new(dir.path()).await.unwrap();

        let data = b"folder data".to_vec();
        store
            .put(Some("avatars"), "abc123.png", data.clone())
            .await
            .unwrap();

        assert!(dir.path().join("avatars").join("abc123.png").exists());
        let read_back = store.get(Some("avatars"), "abc123.png").await.unwrap();
        assert_eq!(read_back, Some(data));
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let dir = tempdir().unwrap();
        let store = LocalContentStore::new(dir.path()).await.unwrap();

        let result = store.get(None, "missing.txt").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let dir = tempdir().unwrap();
        let store = LocalContentStore::new(dir.path()).await.unwrap();

        assert!(store.delete(None, "missing.txt").await.is_ok());
        assert!(store.delete(Some("nowhere"), "missing.txt").await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_removes_file() {
        let dir = tempdir().unwrap();
        let store = LocalContentStore::new(dir.path()).await.unwrap();

        store.put(None, "gone.txt", b"bytes".to_vec()).await.unwrap();
        store.delete(None, "gone.txt").await.unwrap();

        assert_eq!(store.get(None, "gone.txt").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let store = LocalContentStore::new(dir.path()).await.unwrap();

        let result = store.get(None, "../../../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidName(_))));

        let result = store.put(Some("../escape"), "x.txt", b"x".to_vec()).await;
        assert!(matches!(result, Err(StorageError::InvalidName(_))));

        let result = store.delete(None, "/etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidName(_))));
    }
}

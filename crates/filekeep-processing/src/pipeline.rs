//! Storage orchestration pipeline.
//!
//! The canonical upload flow is validate → (transform) → store → record.
//! Bytes are written and fsynced before the metadata insert; a failed
//! insert leaves an orphaned file, which the
//! [`OrphanSweeper`](crate::sweep::OrphanSweeper) reclaims later.

use std::sync::Arc;

use chrono::Utc;
use filekeep_core::{
    generate_public_id, AppError, FileKind, FileRecord, StorageConfig, Transformation,
    UploadResult, UrlBuilder,
};
use filekeep_db::FileRecordRepository;
use filekeep_storage::ContentStore;
use tokio::sync::Semaphore;

use crate::image::{self, TransformedImage};
use crate::validator::{file_extension, FileValidator};

/// How many freshly drawn public ids may collide before an upload is
/// abandoned.
const MAX_ID_ATTEMPTS: usize = 3;

/// Bytes and descriptive labels for a retrieved file.
#[derive(Debug, Clone)]
pub struct FileDownload {
    pub data: Vec<u8>,
    pub content_type: String,
    pub original_filename: String,
}

/// Storage orchestrator.
///
/// Composes the validator, image transformer, content store and metadata
/// repository behind the boundary operations of the service. Upload
/// failures collapse into a [`UploadResult`] carrying only a message;
/// there is no partial success.
#[derive(Clone)]
pub struct FileService {
    config: Arc<StorageConfig>,
    store: Arc<dyn ContentStore>,
    records: Arc<dyn FileRecordRepository>,
    validator: Arc<FileValidator>,
    urls: UrlBuilder,
    transform_permits: Arc<Semaphore>,
}

impl FileService {
    pub fn new(
        config: StorageConfig,
        store: Arc<dyn ContentStore>,
        records: Arc<dyn FileRecordRepository>,
    ) -> Self {
        let validator = Arc::new(FileValidator::from_config(&config));
        let urls = UrlBuilder::new(config.base_url.clone());
        let transform_permits = Arc::new(Semaphore::new(config.max_concurrent_transforms));

        FileService {
            config: Arc::new(config),
            store,
            records,
            validator,
            urls,
            transform_permits,
        }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Upload a file without transformation.
    #[tracing::instrument(skip(self, data), fields(filename = %filename, size = data.len()))]
    pub async fn upload(
        &self,
        data: Vec<u8>,
        filename: &str,
        content_type: &str,
        folder: Option<&str>,
    ) -> UploadResult {
        if let Err(e) = self.validator.validate(filename, data.len() as u64) {
            tracing::debug!(error = %e, "Upload rejected by policy");
            return UploadResult::failure("Invalid file type or size");
        }

        match self.store_file(data, filename, content_type, folder).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(error = %e, "Upload failed");
                UploadResult::failure(format!("Upload failed: {}", e))
            }
        }
    }

    /// Upload a file, applying the transformation before storage when the
    /// file is a recognized image. Non-image files skip transformation and
    /// take the plain upload path.
    #[tracing::instrument(skip(self, data, transformation), fields(filename = %filename, size = data.len()))]
    pub async fn upload_with_transform(
        &self,
        data: Vec<u8>,
        filename: &str,
        content_type: &str,
        transformation: &Transformation,
        folder: Option<&str>,
    ) -> UploadResult {
        if let Err(e) = self.validator.validate(filename, data.len() as u64) {
            tracing::debug!(error = %e, "Upload rejected by policy");
            return UploadResult::failure("Invalid file type or size");
        }

        let extension = file_extension(filename).unwrap_or_default();
        if !image::is_image_extension(&extension) {
            return match self.store_file(data, filename, content_type, folder).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!(error = %e, "Upload failed");
                    UploadResult::failure(format!("Upload failed: {}", e))
                }
            };
        }

        match self
            .transform_and_store(data, filename, transformation, folder)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(error = %e, "Upload with transformation failed");
                UploadResult::failure(format!("Upload with transformation failed: {}", e))
            }
        }
    }

    /// Retrieve stored bytes plus content type and original name.
    pub async fn get_file(&self, public_id: &str) -> Result<Option<FileDownload>, AppError> {
        let Some(record) = self.records.find_by_id(public_id).await? else {
            return Ok(None);
        };

        let data = self
            .store
            .get(record.folder.as_deref(), &record.stored_filename)
            .await?;

        Ok(data.map(|data| FileDownload {
            data,
            content_type: record.content_type,
            original_filename: record.original_filename,
        }))
    }

    /// Retrieve a file with the transformation applied on the fly.
    ///
    /// The variant is recomputed on every request; nothing is cached.
    /// Non-image records return the stored bytes unchanged.
    pub async fn get_file_transformed(
        &self,
        public_id: &str,
        transformation: &Transformation,
    ) -> Result<Option<FileDownload>, AppError> {
        let Some(record) = self.records.find_by_id(public_id).await? else {
            return Ok(None);
        };

        let Some(data) = self
            .store
            .get(record.folder.as_deref(), &record.stored_filename)
            .await?
        else {
            return Ok(None);
        };

        if record.kind != FileKind::Image {
            return Ok(Some(FileDownload {
                data,
                content_type: record.content_type,
                original_filename: record.original_filename,
            }));
        }

        let transformed = self.run_transform(data, transformation.clone()).await?;
        let content_type = transformed.content_type().to_string();

        Ok(Some(FileDownload {
            data: transformed.data,
            content_type,
            original_filename: record.original_filename,
        }))
    }

    /// Fetch the metadata record for a public id.
    pub async fn get_metadata(&self, public_id: &str) -> Result<Option<FileRecord>, AppError> {
        self.records.find_by_id(public_id).await
    }

    /// Delete a file and its record. Returns whether a record existed.
    ///
    /// Byte deletion is best-effort: a missing file is not an error, and a
    /// storage failure still lets the record deletion proceed.
    pub async fn delete_file(&self, public_id: &str) -> Result<bool, AppError> {
        let Some(record) = self.records.find_by_id(public_id).await? else {
            return Ok(false);
        };

        if let Err(e) = self
            .store
            .delete(record.folder.as_deref(), &record.stored_filename)
            .await
        {
            tracing::warn!(error = %e, public_id = %public_id, "Failed to delete stored bytes");
        }

        self.records.delete_by_id(public_id).await?;

        tracing::info!(public_id = %public_id, "File deleted");
        Ok(true)
    }

    /// Canonical or transformation-parameterized URL for a public id.
    pub fn build_url(&self, public_id: &str, transformation: Option<&Transformation>) -> String {
        self.urls.url_for(public_id, transformation)
    }

    /// Draw a public id that no existing record uses.
    async fn next_public_id(&self) -> Result<String, AppError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let public_id = generate_public_id();
            if !self.records.exists(&public_id).await? {
                return Ok(public_id);
            }
            tracing::warn!(public_id = %public_id, "Public id collision, redrawing");
        }
        Err(AppError::Internal(
            "Exhausted public id attempts".to_string(),
        ))
    }

    async fn store_file(
        &self,
        data: Vec<u8>,
        filename: &str,
        content_type: &str,
        folder: Option<&str>,
    ) -> Result<UploadResult, AppError> {
        let extension = file_extension(filename).ok_or_else(|| {
            AppError::InvalidInput(format!("Missing file extension: {}", filename))
        })?;

        let public_id = self.next_public_id().await?;
        let stored_filename = format!("{}.{}", public_id, extension);
        let size = data.len() as i64;

        self.store.put(folder, &stored_filename, data).await?;

        let record = FileRecord {
            public_id: public_id.clone(),
            original_filename: filename.to_string(),
            stored_filename,
            content_type: content_type.to_string(),
            size,
            kind: FileKind::from_extension(&extension),
            folder: folder.map(str::to_string),
            uploaded_at: Utc::now(),
            url: self.urls.file_url(&public_id),
        };
        self.records.save(&record).await?;

        tracing::info!(
            public_id = %record.public_id,
            stored_filename = %record.stored_filename,
            kind = record.kind.as_str(),
            "File uploaded"
        );

        Ok(UploadResult::completed(&record, "File uploaded successfully"))
    }

    async fn transform_and_store(
        &self,
        data: Vec<u8>,
        filename: &str,
        transformation: &Transformation,
        folder: Option<&str>,
    ) -> Result<UploadResult, AppError> {
        let transformed = self.run_transform(data, transformation.clone()).await?;

        let public_id = self.next_public_id().await?;
        let stored_filename = format!("{}.{}", public_id, transformed.extension());
        let content_type = transformed.content_type().to_string();
        let size = transformed.data.len() as i64;

        self.store.put(folder, &stored_filename, transformed.data).await?;

        let record = FileRecord {
            public_id: public_id.clone(),
            original_filename: filename.to_string(),
            stored_filename,
            content_type,
            size,
            kind: FileKind::Image,
            folder: folder.map(str::to_string),
            uploaded_at: Utc::now(),
            url: self.urls.file_url(&public_id),
        };
        self.records.save(&record).await?;

        tracing::info!(
            public_id = %record.public_id,
            stored_filename = %record.stored_filename,
            "File uploaded and transformed"
        );

        Ok(UploadResult::completed(
            &record,
            "File uploaded and processed successfully",
        ))
    }

    /// Run the CPU-bound transformation on the blocking pool, bounded by
    /// the configured number of concurrent transforms.
    async fn run_transform(
        &self,
        data: Vec<u8>,
        transformation: Transformation,
    ) -> Result<TransformedImage, AppError> {
        let _permit = self
            .transform_permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| AppError::Internal("Transform semaphore closed".to_string()))?;

        tokio::task::spawn_blocking(move || image::transform(&data, &transformation))
            .await
            .map_err(|e| AppError::Internal(format!("Transform task failed: {}", e)))?
            .map_err(AppError::from)
    }
}

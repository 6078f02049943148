//! Postgres-backed metadata repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use filekeep_core::{AppError, FileKind, FileRecord};
use sqlx::{PgPool, Postgres};

use crate::repository::FileRecordRepository;

/// Row mapping for the `file_records` table.
#[derive(sqlx::FromRow)]
struct FileRecordRow {
    public_id: String,
    original_filename: String,
    stored_filename: String,
    content_type: String,
    size: i64,
    kind: String,
    folder: Option<String>,
    uploaded_at: DateTime<Utc>,
    url: String,
}

impl FileRecordRow {
    fn into_record(self) -> FileRecord {
        FileRecord {
            public_id: self.public_id,
            original_filename: self.original_filename,
            stored_filename: self.stored_filename,
            content_type: self.content_type,
            size: self.size,
            kind: FileKind::parse(&self.kind),
            folder: self.folder,
            uploaded_at: self.uploaded_at,
            url: self.url,
        }
    }
}

/// Metadata repository backed by Postgres.
#[derive(Clone)]
pub struct PgFileRecordRepository {
    pool: PgPool,
}

impl PgFileRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the backing table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS file_records (
                public_id TEXT PRIMARY KEY,
                original_filename TEXT NOT NULL,
                stored_filename TEXT NOT NULL,
                content_type TEXT NOT NULL,
                size BIGINT NOT NULL,
                kind TEXT NOT NULL,
                folder TEXT,
                uploaded_at TIMESTAMPTZ NOT NULL,
                url TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        tracing::info!("Ensured file_records schema");
        Ok(())
    }
}

#[async_trait]
impl FileRecordRepository for PgFileRecordRepository {
    async fn save(&self, record: &FileRecord) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO file_records (
                public_id, original_filename, stored_filename, content_type,
                size, kind, folder, uploaded_at, url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&record.public_id)
        .bind(&record.original_filename)
        .bind(&record.stored_filename)
        .bind(&record.content_type)
        .bind(record.size)
        .bind(record.kind.as_str())
        .bind(&record.folder)
        .bind(record.uploaded_at)
        .bind(&record.url)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, public_id: &str) -> Result<Option<FileRecord>, AppError> {
        let row: Option<FileRecordRow> = sqlx::query_as::<Postgres, FileRecordRow>(
            "SELECT * FROM file_records WHERE public_id = $1",
        )
        .bind(public_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(FileRecordRow::into_record))
    }

    async fn delete_by_id(&self, public_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM file_records WHERE public_id = $1")
            .bind(public_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, public_id: &str) -> Result<bool, AppError> {
        let row: Option<(bool,)> =
            sqlx::query_as("SELECT TRUE FROM file_records WHERE public_id = $1")
                .bind(public_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.is_some())
    }
}

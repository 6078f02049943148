use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

use super::{FileKind, FileRecord};

/// Outcome of an upload operation, returned to the caller.
///
/// Distinct from [`FileRecord`]: results are never persisted. A failed
/// upload carries only the message; no identifier is usable.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stored_filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<FileKind>,
    pub size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub metadata: Option<HashMap<String, JsonValue>>,
}

impl UploadResult {
    /// Failure result carrying a human-readable message.
    pub fn failure(message: impl Into<String>) -> Self {
        UploadResult {
            success: false,
            message: message.into(),
            public_id: None,
            stored_filename: None,
            original_filename: None,
            url: None,
            kind: None,
            size: 0,
            uploaded_at: None,
            metadata: None,
        }
    }

    /// Success result built from the persisted record.
    pub fn completed(record: &FileRecord, message: impl Into<String>) -> Self {
        UploadResult {
            success: true,
            message: message.into(),
            public_id: Some(record.public_id.clone()),
            stored_filename: Some(record.stored_filename.clone()),
            original_filename: Some(record.original_filename.clone()),
            url: Some(record.url.clone()),
            kind: Some(record.kind),
            size: record.size,
            uploaded_at: Some(record.uploaded_at),
            metadata: None,
        }
    }
}

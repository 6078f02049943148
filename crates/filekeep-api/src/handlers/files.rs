//! File upload, retrieval, metadata, URL and deletion handlers.

use axum::extract::{Multipart, Path, Query, RawQuery, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use filekeep_core::{AppError, CropMode, FileRecord, OutputFormat, Transformation, UploadResult};
use filekeep_processing::FileDownload;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct FolderQuery {
    /// Optional folder scope for the stored bytes.
    pub folder: Option<String>,
}

/// Transformation parameters in long query form (upload + url endpoints).
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct TransformQuery {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub format: Option<String>,
    pub quality: Option<u8>,
    #[serde(default)]
    pub crop: bool,
    pub crop_mode: Option<String>,
    pub folder: Option<String>,
}

impl TransformQuery {
    fn to_transformation(&self) -> Transformation {
        Transformation {
            width: self.width,
            height: self.height,
            format: self.format.as_deref().and_then(OutputFormat::parse),
            quality: self.quality,
            crop: self.crop,
            crop_mode: self
                .crop_mode
                .as_deref()
                .map(CropMode::parse)
                .unwrap_or_default(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct MetadataResponse {
    pub success: bool,
    pub data: FileRecord,
}

#[derive(Serialize, ToSchema)]
pub struct UrlResponse {
    pub success: bool,
    pub url: String,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// Pull the `file` field out of a multipart body.
async fn read_file_field(multipart: &mut Multipart) -> Result<(Vec<u8>, String, String), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("file").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read upload: {}", e)))?
            .to_vec();

        return Ok((data, filename, content_type));
    }

    Err(AppError::InvalidInput("No file provided".to_string()))
}

fn upload_response(result: UploadResult) -> Response {
    let status = if result.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    (status, Json(result)).into_response()
}

fn file_response(download: FileDownload) -> Response {
    let disposition = format!(
        "inline; filename=\"{}\"",
        download.original_filename.replace('"', "")
    );
    (
        [
            (header::CONTENT_TYPE, download.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        download.data,
    )
        .into_response()
}

#[utoipa::path(
    post,
    path = "/api/files/upload",
    tag = "files",
    params(FolderQuery),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File uploaded", body = UploadResult),
        (status = 400, description = "Rejected by policy", body = UploadResult)
    )
)]
pub async fn upload_file(
    State(state): State<AppState>,
    Query(query): Query<FolderQuery>,
    mut multipart: Multipart,
) -> Result<Response, HttpAppError> {
    let (data, filename, content_type) = read_file_field(&mut multipart).await?;
    if data.is_empty() {
        return Err(AppError::InvalidInput("No file provided".to_string()).into());
    }

    let result = state
        .files
        .upload(data, &filename, &content_type, query.folder.as_deref())
        .await;
    Ok(upload_response(result))
}

#[utoipa::path(
    post,
    path = "/api/files/upload/transform",
    tag = "files",
    params(TransformQuery),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File uploaded and processed", body = UploadResult),
        (status = 400, description = "Rejected by policy or unprocessable image", body = UploadResult)
    )
)]
pub async fn upload_file_with_transformation(
    State(state): State<AppState>,
    Query(query): Query<TransformQuery>,
    mut multipart: Multipart,
) -> Result<Response, HttpAppError> {
    let (data, filename, content_type) = read_file_field(&mut multipart).await?;
    if data.is_empty() {
        return Err(AppError::InvalidInput("No file provided".to_string()).into());
    }

    let transformation = query.to_transformation();
    let result = state
        .files
        .upload_with_transform(
            data,
            &filename,
            &content_type,
            &transformation,
            query.folder.as_deref(),
        )
        .await;
    Ok(upload_response(result))
}

#[utoipa::path(
    get,
    path = "/api/files/{public_id}",
    tag = "files",
    params(
        ("public_id" = String, Path, description = "Public file id")
    ),
    responses(
        (status = 200, description = "File content"),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
pub async fn get_file(
    State(state): State<AppState>,
    Path(public_id): Path<String>,
) -> Result<Response, HttpAppError> {
    let download = state
        .files
        .get_file(&public_id)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

    Ok(file_response(download))
}

/// Parse the short `w_800&h_600&f_webp&q_90&c_fill` token form used by
/// transformation URLs. Unknown tokens are ignored.
fn parse_transform_tokens(query: &str) -> Transformation {
    let mut transformation = Transformation::default();
    for token in query.split('&') {
        let Some((key, value)) = token.split_once('_') else {
            continue;
        };
        match key {
            "w" => transformation.width = value.parse().ok(),
            "h" => transformation.height = value.parse().ok(),
            "f" => transformation.format = OutputFormat::parse(value),
            "q" => transformation.quality = value.parse().ok(),
            "c" => {
                transformation.crop = true;
                transformation.crop_mode = CropMode::parse(value);
            }
            _ => {}
        }
    }
    transformation
}

#[utoipa::path(
    get,
    path = "/api/files/{public_id}/transform",
    tag = "files",
    params(
        ("public_id" = String, Path, description = "Public file id")
    ),
    responses(
        (status = 200, description = "Transformed file content, recomputed per request"),
        (status = 400, description = "Unprocessable image", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
pub async fn get_transformed_file(
    State(state): State<AppState>,
    Path(public_id): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Response, HttpAppError> {
    let transformation = parse_transform_tokens(query.as_deref().unwrap_or(""));

    let download = if transformation == Transformation::default() {
        state.files.get_file(&public_id).await?
    } else {
        state
            .files
            .get_file_transformed(&public_id, &transformation)
            .await?
    }
    .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

    Ok(file_response(download))
}

#[utoipa::path(
    get,
    path = "/api/files/{public_id}/metadata",
    tag = "files",
    params(
        ("public_id" = String, Path, description = "Public file id")
    ),
    responses(
        (status = 200, description = "File metadata", body = MetadataResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
pub async fn get_file_metadata(
    State(state): State<AppState>,
    Path(public_id): Path<String>,
) -> Result<Json<MetadataResponse>, HttpAppError> {
    let record = state
        .files
        .get_metadata(&public_id)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

    Ok(Json(MetadataResponse {
        success: true,
        data: record,
    }))
}

#[utoipa::path(
    get,
    path = "/api/files/{public_id}/url",
    tag = "files",
    params(
        ("public_id" = String, Path, description = "Public file id"),
        TransformQuery
    ),
    responses(
        (status = 200, description = "Retrieval URL", body = UrlResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
pub async fn get_file_url(
    State(state): State<AppState>,
    Path(public_id): Path<String>,
    Query(query): Query<TransformQuery>,
) -> Result<Json<UrlResponse>, HttpAppError> {
    if state.files.get_metadata(&public_id).await?.is_none() {
        return Err(AppError::NotFound("File not found".to_string()).into());
    }

    let transformation = query.to_transformation();
    let url = state.files.build_url(&public_id, Some(&transformation));

    Ok(Json(UrlResponse { success: true, url }))
}

#[utoipa::path(
    delete,
    path = "/api/files/{public_id}",
    tag = "files",
    params(
        ("public_id" = String, Path, description = "Public file id")
    ),
    responses(
        (status = 200, description = "File deleted", body = MessageResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
pub async fn delete_file(
    State(state): State<AppState>,
    Path(public_id): Path<String>,
) -> Result<Json<MessageResponse>, HttpAppError> {
    let deleted = state.files.delete_file(&public_id).await?;
    if !deleted {
        return Err(AppError::NotFound("File not found or could not be deleted".to_string()).into());
    }

    Ok(Json(MessageResponse {
        success: true,
        message: "File deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transform_tokens() {
        let t = parse_transform_tokens("w_800&h_600&f_webp&q_90&c_fill");
        assert_eq!(t.width, Some(800));
        assert_eq!(t.height, Some(600));
        assert_eq!(t.format, Some(OutputFormat::WebP));
        assert_eq!(t.quality, Some(90));
        assert!(t.crop);
        assert_eq!(t.crop_mode, CropMode::Fill);
    }

    #[test]
    fn test_parse_transform_tokens_ignores_unknown() {
        let t = parse_transform_tokens("w_100&x_9&junk");
        assert_eq!(t.width, Some(100));
        assert_eq!(t.height, None);
        assert!(!t.crop);
    }

    #[test]
    fn test_parse_transform_tokens_empty_query() {
        assert_eq!(parse_transform_tokens(""), Transformation::default());
    }
}

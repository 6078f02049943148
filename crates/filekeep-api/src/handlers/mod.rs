//! Request handlers and the OpenAPI document.

pub mod files;
pub mod health;

use axum::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        files::upload_file,
        files::upload_file_with_transformation,
        files::get_file,
        files::get_transformed_file,
        files::get_file_metadata,
        files::get_file_url,
        files::delete_file,
        health::health,
    ),
    components(schemas(
        filekeep_core::UploadResult,
        filekeep_core::FileRecord,
        filekeep_core::FileKind,
        filekeep_core::Transformation,
        filekeep_core::OutputFormat,
        filekeep_core::CropMode,
        crate::error::ErrorResponse,
        files::MetadataResponse,
        files::UrlResponse,
        files::MessageResponse,
        health::HealthResponse,
    )),
    tags(
        (name = "files", description = "File storage operations"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;

pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

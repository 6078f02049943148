//! Route configuration.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Extra room for multipart framing on top of the configured file cap.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.files.config().max_file_size as usize + MULTIPART_OVERHEAD_BYTES;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/files/upload", post(handlers::files::upload_file))
        .route(
            "/api/files/upload/transform",
            post(handlers::files::upload_file_with_transformation),
        )
        .route(
            "/api/files/{public_id}",
            get(handlers::files::get_file).delete(handlers::files::delete_file),
        )
        .route(
            "/api/files/{public_id}/transform",
            get(handlers::files::get_transformed_file),
        )
        .route(
            "/api/files/{public_id}/metadata",
            get(handlers::files::get_file_metadata),
        )
        .route(
            "/api/files/{public_id}/url",
            get(handlers::files::get_file_url),
        )
        .route("/api-docs/openapi.json", get(handlers::openapi))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

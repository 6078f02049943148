//! HTTP surface tests against the in-memory repository and a temporary
//! local content store.

use std::io::Cursor;
use std::sync::Arc;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use filekeep_api::{build_router, AppState};
use filekeep_core::StorageConfig;
use filekeep_db::MemoryFileRecordRepository;
use filekeep_processing::FileService;
use filekeep_storage::LocalContentStore;
use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
use tempfile::TempDir;

async fn test_server(dir: &TempDir) -> TestServer {
    let store = Arc::new(LocalContentStore::new(dir.path()).await.unwrap());
    let records = Arc::new(MemoryFileRecordRepository::new());
    let service = FileService::new(StorageConfig::default(), store, records);
    TestServer::new(build_router(AppState { files: service })).unwrap()
}

fn file_part(data: Vec<u8>, filename: &str, mime: &str) -> MultipartForm {
    let part = Part::bytes(data).file_name(filename).mime_type(mime);
    MultipartForm::new().add_part("file", part)
}

fn png_fixture(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([50, 90, 160])));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}

async fn upload_text(server: &TestServer, body: &[u8]) -> String {
    let response = server
        .post("/api/files/upload")
        .multipart(file_part(body.to_vec(), "hello.txt", "text/plain"))
        .await;
    response.assert_status_ok();
    let result: serde_json::Value = response.json();
    assert_eq!(result["success"], true);
    result["public_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_upload_and_download() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir).await;

    let public_id = upload_text(&server, b"hello filekeep").await;

    let download = server.get(&format!("/api/files/{}", public_id)).await;
    download.assert_status_ok();
    assert_eq!(download.as_bytes().to_vec(), b"hello filekeep".to_vec());
    assert_eq!(
        download.headers().get("content-type").unwrap(),
        "text/plain"
    );
}

#[tokio::test]
async fn test_upload_rejects_disallowed_extension() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir).await;

    let response = server
        .post("/api/files/upload")
        .multipart(file_part(b"MZ".to_vec(), "tool.exe", "application/octet-stream"))
        .await;
    response.assert_status_bad_request();
    let result: serde_json::Value = response.json();
    assert_eq!(result["success"], false);
    assert_eq!(result["message"], "Invalid file type or size");
}

#[tokio::test]
async fn test_get_unknown_id_returns_404() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir).await;

    server.get("/api/files/unknownid123").await.assert_status_not_found();
    server
        .get("/api/files/unknownid123/metadata")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_metadata_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir).await;

    let public_id = upload_text(&server, b"metadata target").await;

    let response = server.get(&format!("/api/files/{}/metadata", public_id)).await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["public_id"], public_id.as_str());
    assert_eq!(body["data"]["kind"], "document");
    assert_eq!(body["data"]["content_type"], "text/plain");
}

#[tokio::test]
async fn test_delete_then_gone() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir).await;

    let public_id = upload_text(&server, b"to be deleted").await;

    let response = server.delete(&format!("/api/files/{}", public_id)).await;
    response.assert_status_ok();

    server
        .get(&format!("/api/files/{}", public_id))
        .await
        .assert_status_not_found();
    server
        .delete(&format!("/api/files/{}", public_id))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_url_endpoint_encodes_transform_tokens() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir).await;

    let public_id = upload_text(&server, b"url target").await;

    let response = server
        .get(&format!(
            "/api/files/{}/url?width=800&format=webp",
            public_id
        ))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["url"].as_str().unwrap(),
        format!(
            "https://localhost:7000/api/files/{}/transform?w_800&f_webp",
            public_id
        )
    );
}

#[tokio::test]
async fn test_transform_on_read_resizes_image() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir).await;

    let response = server
        .post("/api/files/upload")
        .multipart(file_part(png_fixture(200, 50), "banner.png", "image/png"))
        .await;
    response.assert_status_ok();
    let result: serde_json::Value = response.json();
    let public_id = result["public_id"].as_str().unwrap().to_string();

    let transformed = server
        .get(&format!("/api/files/{}/transform?w_50&f_png", public_id))
        .await;
    transformed.assert_status_ok();
    assert_eq!(
        transformed.headers().get("content-type").unwrap(),
        "image/png"
    );
    let decoded = image::load_from_memory(&transformed.as_bytes()).unwrap();
    assert_eq!(decoded.dimensions(), (50, 13));
}

#[tokio::test]
async fn test_transform_upload_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir).await;

    let response = server
        .post("/api/files/upload/transform?width=100&height=100&crop=true&crop_mode=fill&format=png")
        .multipart(file_part(png_fixture(200, 50), "banner.png", "image/png"))
        .await;
    response.assert_status_ok();
    let result: serde_json::Value = response.json();
    assert_eq!(result["success"], true);
    assert!(result["stored_filename"]
        .as_str()
        .unwrap()
        .ends_with(".png"));

    let public_id = result["public_id"].as_str().unwrap();
    let download = server.get(&format!("/api/files/{}", public_id)).await;
    download.assert_status_ok();
    let decoded = image::load_from_memory(&download.as_bytes()).unwrap();
    assert_eq!(decoded.dimensions(), (100, 100));
}

#[tokio::test]
async fn test_health() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir).await;

    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
}

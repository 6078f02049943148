//! Filekeep Core Library
//!
//! This crate provides the domain models, error type, configuration,
//! public identifier generation and URL building shared across all
//! filekeep components.

pub mod config;
pub mod error;
pub mod models;
pub mod public_id;
pub mod url;

// Re-export commonly used types
pub use config::StorageConfig;
pub use error::AppError;
pub use models::{CropMode, FileKind, FileRecord, OutputFormat, Transformation, UploadResult};
pub use public_id::{generate_public_id, PUBLIC_ID_LEN};
pub use url::UrlBuilder;

//! Image transformation: decode, resize, re-encode.

mod encoder;
mod transformer;

use filekeep_core::AppError;

pub use transformer::{is_image_extension, transform, TransformedImage};

/// Image transformation errors
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// Input bytes are not a recognized image format.
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),
}

impl From<TransformError> for AppError {
    fn from(err: TransformError) -> Self {
        AppError::ImageProcessing(err.to_string())
    }
}

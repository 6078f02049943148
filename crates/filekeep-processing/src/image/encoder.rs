//! Format-specific image encoders.

use std::io::Cursor;

use filekeep_core::OutputFormat;
use image::{DynamicImage, GenericImageView, ImageFormat};

use super::TransformError;

/// Encode a raster in the given output format.
///
/// Quality applies to the lossy encoders (1-100); PNG is lossless and
/// ignores it.
pub fn encode(
    img: &DynamicImage,
    format: OutputFormat,
    quality: u8,
) -> Result<Vec<u8>, TransformError> {
    match format {
        OutputFormat::Jpeg => encode_jpeg(img, quality),
        OutputFormat::Png => encode_png(img),
        OutputFormat::WebP => encode_webp(img, quality),
    }
}

/// Encode to JPEG using mozjpeg
fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, TransformError> {
    let rgb_img = img.to_rgb8();
    let (width, height) = rgb_img.dimensions();

    let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
    comp.set_size(width as usize, height as usize);
    comp.set_quality(quality as f32);
    comp.set_progressive_mode();
    comp.set_optimize_coding(true);

    let mut comp = comp
        .start_compress(Vec::new())
        .map_err(|e| TransformError::Encode(e.to_string()))?;
    comp.write_scanlines(&rgb_img)
        .map_err(|e| TransformError::Encode(e.to_string()))?;
    comp.finish()
        .map_err(|e| TransformError::Encode(e.to_string()))
}

/// Encode to PNG
fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, TransformError> {
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|e| TransformError::Encode(e.to_string()))?;
    Ok(buffer)
}

/// Encode to WebP
fn encode_webp(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, TransformError> {
    let (width, height) = img.dimensions();
    let rgba_img = img.to_rgba8();

    let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
    let webp_data = encoder.encode(quality as f32);

    Ok(webp_data.to_vec())
}

//! Image transformer: decode, resize according to the requested mode,
//! re-encode in the resolved output format.

use std::io::Cursor;

use filekeep_core::{CropMode, OutputFormat, Transformation};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

use super::{encoder, TransformError};

/// Extensions recognized as decodable raster images.
const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// Whether the extension names a recognized image type.
pub fn is_image_extension(extension: &str) -> bool {
    let extension = extension.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|e| *e == extension)
}

/// Result of a transformation: encoded bytes plus the resolved format.
#[derive(Debug, Clone)]
pub struct TransformedImage {
    pub data: Vec<u8>,
    pub format: OutputFormat,
}

impl TransformedImage {
    pub fn content_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    pub fn extension(&self) -> &'static str {
        self.format.extension()
    }
}

/// Apply the requested transformation to encoded image bytes.
///
/// The input buffer is only read; the result is always a fresh encode in
/// the resolved output format.
pub fn transform(
    data: &[u8],
    transformation: &Transformation,
) -> Result<TransformedImage, TransformError> {
    let img = image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| TransformError::Decode(e.to_string()))?
        .decode()
        .map_err(|e| TransformError::Decode(e.to_string()))?;

    let img = apply_resize(img, transformation);

    let format = transformation.output_format();
    let data = encoder::encode(&img, format, transformation.clamped_quality())?;

    Ok(TransformedImage { data, format })
}

/// Resize according to the transformation. A missing (or zero) width or
/// height defaults to the source's corresponding dimension.
fn apply_resize(img: DynamicImage, transformation: &Transformation) -> DynamicImage {
    if !transformation.has_resize() {
        return img;
    }

    let width = transformation.width.filter(|w| *w > 0).unwrap_or(img.width());
    let height = transformation
        .height
        .filter(|h| *h > 0)
        .unwrap_or(img.height());

    if transformation.crop {
        match transformation.crop_mode {
            CropMode::Fill => img.resize_to_fill(width, height, FilterType::Lanczos3),
            CropMode::Fit => img.resize(width, height, FilterType::Lanczos3),
            CropMode::Scale => img.resize_exact(width, height, FilterType::Lanczos3),
        }
    } else {
        img.resize(width, height, FilterType::Lanczos3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};

    fn png_fixture(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            Rgb([120, 30, 200]),
        ));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    fn output_dimensions(transformed: &TransformedImage) -> (u32, u32) {
        image::load_from_memory(&transformed.data)
            .unwrap()
            .dimensions()
    }

    #[test]
    fn test_fill_crops_to_exact_box() {
        let t = Transformation {
            width: Some(100),
            height: Some(100),
            crop: true,
            crop_mode: CropMode::Fill,
            ..Transformation::default()
        };
        let out = transform(&png_fixture(200, 50), &t).unwrap();
        assert_eq!(output_dimensions(&out), (100, 100));
    }

    #[test]
    fn test_fit_preserves_aspect_ratio_within_box() {
        let t = Transformation {
            width: Some(100),
            height: Some(100),
            crop: true,
            crop_mode: CropMode::Fit,
            ..Transformation::default()
        };
        let out = transform(&png_fixture(200, 50), &t).unwrap();
        assert_eq!(output_dimensions(&out), (100, 25));
    }

    #[test]
    fn test_scale_stretches_to_exact_dimensions() {
        let t = Transformation {
            width: Some(100),
            height: Some(100),
            crop: true,
            crop_mode: CropMode::Scale,
            ..Transformation::default()
        };
        let out = transform(&png_fixture(200, 50), &t).unwrap();
        assert_eq!(output_dimensions(&out), (100, 100));
    }

    #[test]
    fn test_plain_resize_fits_larger_dimension() {
        let t = Transformation {
            width: Some(100),
            height: Some(100),
            ..Transformation::default()
        };
        let out = transform(&png_fixture(200, 50), &t).unwrap();
        assert_eq!(output_dimensions(&out), (100, 25));
    }

    #[test]
    fn test_missing_axis_defaults_to_source_dimension() {
        let t = Transformation {
            width: Some(100),
            crop: true,
            crop_mode: CropMode::Fill,
            ..Transformation::default()
        };
        let out = transform(&png_fixture(200, 50), &t).unwrap();
        assert_eq!(output_dimensions(&out), (100, 50));
    }

    #[test]
    fn test_no_resize_reencodes_at_source_dimensions() {
        let out = transform(&png_fixture(64, 48), &Transformation::default()).unwrap();
        assert_eq!(out.format, OutputFormat::Jpeg);
        assert_eq!(output_dimensions(&out), (64, 48));
    }

    #[test]
    fn test_default_encoding_is_jpeg() {
        let out = transform(&png_fixture(10, 10), &Transformation::default()).unwrap();
        assert_eq!(
            image::guess_format(&out.data).unwrap(),
            ImageFormat::Jpeg
        );
        assert_eq!(out.content_type(), "image/jpeg");
        assert_eq!(out.extension(), "jpg");
    }

    #[test]
    fn test_webp_encoding() {
        let t = Transformation {
            format: Some(OutputFormat::WebP),
            quality: Some(70),
            ..Transformation::default()
        };
        let out = transform(&png_fixture(10, 10), &t).unwrap();
        assert_eq!(image::guess_format(&out.data).unwrap(), ImageFormat::WebP);
        assert_eq!(out.content_type(), "image/webp");
    }

    #[test]
    fn test_png_encoding() {
        let t = Transformation {
            format: Some(OutputFormat::Png),
            ..Transformation::default()
        };
        let out = transform(&png_fixture(10, 10), &t).unwrap();
        assert_eq!(image::guess_format(&out.data).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_decode_error_on_unrecognized_bytes() {
        let result = transform(b"definitely not an image", &Transformation::default());
        assert!(matches!(result, Err(TransformError::Decode(_))));
    }

    #[test]
    fn test_input_buffer_is_untouched() {
        let data = png_fixture(10, 10);
        let snapshot = data.clone();
        let _ = transform(&data, &Transformation::default()).unwrap();
        assert_eq!(data, snapshot);
    }

    #[test]
    fn test_is_image_extension() {
        assert!(is_image_extension("jpg"));
        assert!(is_image_extension("WEBP"));
        assert!(!is_image_extension("pdf"));
        assert!(!is_image_extension(""));
    }
}

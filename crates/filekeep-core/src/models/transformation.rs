use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Encoder quality applied when the request does not specify one.
pub const DEFAULT_QUALITY: u8 = 85;

/// Output image format for re-encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
}

impl OutputFormat {
    /// Parse a format name. Unknown names yield `None`; callers fall back
    /// to the default encoder.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            "png" => Some(OutputFormat::Png),
            "webp" => Some(OutputFormat::WebP),
            _ => None,
        }
    }

    pub fn to_mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::WebP => "image/webp",
        }
    }

    /// File extension for stored variants; also the `f_` URL token.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::WebP => "webp",
        }
    }
}

/// Crop mode for resize-with-crop requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CropMode {
    /// Scale and center-crop to cover the target box exactly.
    #[default]
    Fill,
    /// Scale to fit entirely within the box, preserving aspect ratio.
    Fit,
    /// Stretch to the exact dimensions, ignoring aspect ratio.
    Scale,
}

impl CropMode {
    /// Parse a crop mode name. Unknown names resolve to `Fill`.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "fit" => CropMode::Fit,
            "scale" => CropMode::Scale,
            _ => CropMode::Fill,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CropMode::Fill => "fill",
            CropMode::Fit => "fit",
            CropMode::Scale => "scale",
        }
    }
}

/// Requested image transformation.
///
/// All fields are optional; absence means no change on that axis. The
/// crop mode only takes effect when `crop` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Transformation {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub format: Option<OutputFormat>,
    pub quality: Option<u8>,
    #[serde(default)]
    pub crop: bool,
    #[serde(default)]
    pub crop_mode: CropMode,
}

impl Transformation {
    /// Whether a resize is requested on either axis.
    pub fn has_resize(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }

    /// Output format with the default encoder applied.
    pub fn output_format(&self) -> OutputFormat {
        self.format.unwrap_or(OutputFormat::Jpeg)
    }

    /// Quality clamped to the valid 1-100 range, defaulting to
    /// [`DEFAULT_QUALITY`].
    pub fn clamped_quality(&self) -> u8 {
        self.quality.unwrap_or(DEFAULT_QUALITY).clamp(1, 100)
    }
}

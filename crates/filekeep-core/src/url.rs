//! Retrieval URL construction.

use crate::models::Transformation;

/// Builds canonical and transformation-parameterized retrieval URLs.
///
/// Transformation URLs encode only the present fields, in fixed order
/// (width, height, format, quality, crop mode), so equal inputs always
/// produce byte-identical strings.
#[derive(Clone, Debug)]
pub struct UrlBuilder {
    base_url: String,
}

impl UrlBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        UrlBuilder { base_url }
    }

    /// Canonical retrieval URL for a public id.
    pub fn file_url(&self, public_id: &str) -> String {
        format!("{}/api/files/{}", self.base_url, public_id)
    }

    /// Transformation URL for a public id. Falls back to the canonical URL
    /// when the transformation carries no fields.
    pub fn transform_url(&self, public_id: &str, transformation: &Transformation) -> String {
        let mut params = Vec::new();
        if let Some(width) = transformation.width {
            params.push(format!("w_{}", width));
        }
        if let Some(height) = transformation.height {
            params.push(format!("h_{}", height));
        }
        if let Some(format) = transformation.format {
            params.push(format!("f_{}", format.extension()));
        }
        if let Some(quality) = transformation.quality {
            params.push(format!("q_{}", quality));
        }
        if transformation.crop {
            params.push(format!("c_{}", transformation.crop_mode.as_str()));
        }

        if params.is_empty() {
            return self.file_url(public_id);
        }
        format!(
            "{}/api/files/{}/transform?{}",
            self.base_url,
            public_id,
            params.join("&")
        )
    }

    pub fn url_for(&self, public_id: &str, transformation: Option<&Transformation>) -> String {
        match transformation {
            Some(t) => self.transform_url(public_id, t),
            None => self.file_url(public_id),
        }
    }
}

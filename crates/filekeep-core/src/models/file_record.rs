use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// File category derived from the stored extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Document,
    Video,
    Audio,
    Other,
}

impl FileKind {
    /// Derive the category from a file extension (without leading dot).
    pub fn from_extension(extension: &str) -> Self {
        match extension.to_lowercase().as_str() {
            "jpg" | "jpeg" | "png" | "gif" | "bmp" | "webp" => FileKind::Image,
            "pdf" | "doc" | "docx" | "txt" | "rtf" => FileKind::Document,
            "mp4" | "avi" | "mov" | "wmv" => FileKind::Video,
            "mp3" | "wav" | "ogg" => FileKind::Audio,
            _ => FileKind::Other,
        }
    }

    /// Parse a stored category name. Unknown names map to `Other`.
    pub fn parse(s: &str) -> Self {
        match s {
            "image" => FileKind::Image,
            "document" => FileKind::Document,
            "video" => FileKind::Video,
            "audio" => FileKind::Audio,
            _ => FileKind::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::Image => "image",
            FileKind::Document => "document",
            FileKind::Video => "video",
            FileKind::Audio => "audio",
            FileKind::Other => "other",
        }
    }
}

/// Persisted metadata record for a stored file.
///
/// `public_id` is the sole lookup key. `stored_filename` is always
/// `{public_id}.{extension}` and is never reused across records; `folder`
/// locates the bytes within the content store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FileRecord {
    pub public_id: String,
    pub original_filename: String,
    pub stored_filename: String,
    pub content_type: String,
    pub size: i64,
    pub kind: FileKind,
    pub folder: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub url: String,
}

impl FileRecord {
    /// Extension part of the stored filename, if any.
    pub fn extension(&self) -> Option<&str> {
        self.stored_filename.rsplit_once('.').map(|(_, ext)| ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(FileKind::from_extension("jpg"), FileKind::Image);
        assert_eq!(FileKind::from_extension("WEBP"), FileKind::Image);
        assert_eq!(FileKind::from_extension("pdf"), FileKind::Document);
        assert_eq!(FileKind::from_extension("mov"), FileKind::Video);
        assert_eq!(FileKind::from_extension("ogg"), FileKind::Audio);
        assert_eq!(FileKind::from_extension("zip"), FileKind::Other);
    }

    #[test]
    fn test_kind_parse_roundtrip() {
        for kind in [
            FileKind::Image,
            FileKind::Document,
            FileKind::Video,
            FileKind::Audio,
            FileKind::Other,
        ] {
            assert_eq!(FileKind::parse(kind.as_str()), kind);
        }
        assert_eq!(FileKind::parse("mystery"), FileKind::Other);
    }

    #[test]
    fn test_record_extension() {
        let record = FileRecord {
            public_id: "a1b2c3d4e5f6".to_string(),
            original_filename: "photo.png".to_string(),
            stored_filename: "a1b2c3d4e5f6.png".to_string(),
            content_type: "image/png".to_string(),
            size: 42,
            kind: FileKind::Image,
            folder: None,
            uploaded_at: Utc::now(),
            url: "https://localhost:7000/api/files/a1b2c3d4e5f6".to_string(),
        };
        assert_eq!(record.extension(), Some("png"));
    }
}

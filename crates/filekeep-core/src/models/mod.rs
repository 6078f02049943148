//! Domain models shared across filekeep components.

mod file_record;
mod transformation;
mod upload_result;

pub use file_record::{FileKind, FileRecord};
pub use transformation::{CropMode, OutputFormat, Transformation, DEFAULT_QUALITY};
pub use upload_result::UploadResult;

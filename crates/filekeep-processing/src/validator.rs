//! Upload policy validation.

use std::path::Path;

use filekeep_core::StorageConfig;

/// Policy violations for incoming files
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Invalid file extension: {extension} (allowed: {allowed:?})")]
    InvalidExtension {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),
}

/// Size/extension policy gate for incoming files.
///
/// Trusts the declared name and size; this is a policy check, not a
/// content sniffer.
pub struct FileValidator {
    max_file_size: u64,
    allowed_extensions: Vec<String>,
}

impl FileValidator {
    pub fn new(max_file_size: u64, allowed_extensions: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_extensions,
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.max_file_size, config.allowed_extensions.clone())
    }

    /// Validate declared size and extension against the policy.
    pub fn validate(&self, filename: &str, size: u64) -> Result<(), ValidationError> {
        self.validate_size(size)?;
        self.validate_extension(filename)
    }

    fn validate_size(&self, size: u64) -> Result<(), ValidationError> {
        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }
        Ok(())
    }

    fn validate_extension(&self, filename: &str) -> Result<(), ValidationError> {
        let extension = file_extension(filename)
            .ok_or_else(|| ValidationError::InvalidFilename(filename.to_string()))?;

        if !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::InvalidExtension {
                extension,
                allowed: self.allowed_extensions.clone(),
            });
        }

        Ok(())
    }
}

/// Lowercase extension of a filename, without the dot.
pub fn file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

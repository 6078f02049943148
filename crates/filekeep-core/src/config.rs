//! Configuration module
//!
//! Configuration is read from the environment once at startup and passed
//! to the file service as an explicit immutable object.

use std::env;
use std::path::PathBuf;

const MAX_FILE_SIZE_MB: u64 = 100;
const MAX_CONCURRENT_TRANSFORMS: usize = 4;
const SWEEP_GRACE_SECS: u64 = 3600;

const DEFAULT_UPLOAD_PATH: &str = "uploads";
const DEFAULT_BASE_URL: &str = "https://localhost:7000";
const DEFAULT_ALLOWED_EXTENSIONS: &str =
    "jpg,jpeg,png,gif,bmp,webp,pdf,doc,docx,txt,rtf,mp4,avi,mov,wmv,mp3,wav,ogg";

/// Storage service configuration.
#[derive(Clone, Debug)]
pub struct StorageConfig {
    /// Root directory for stored files.
    pub upload_path: PathBuf,
    /// Base URL prefix for generated retrieval URLs.
    pub base_url: String,
    /// Maximum accepted file size in bytes.
    pub max_file_size: u64,
    /// Lowercase extension allow-list, without leading dots.
    pub allowed_extensions: Vec<String>,
    /// Upper bound on concurrently running image transformations.
    pub max_concurrent_transforms: usize,
    /// Minimum age in seconds before an unreferenced stored file is swept.
    pub sweep_grace_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            upload_path: PathBuf::from(DEFAULT_UPLOAD_PATH),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_file_size: MAX_FILE_SIZE_MB * 1024 * 1024,
            allowed_extensions: parse_extension_list(DEFAULT_ALLOWED_EXTENSIONS),
            max_concurrent_transforms: MAX_CONCURRENT_TRANSFORMS,
            sweep_grace_secs: SWEEP_GRACE_SECS,
        }
    }
}

impl StorageConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let upload_path = env::var("UPLOAD_PATH")
            .unwrap_or_else(|_| DEFAULT_UPLOAD_PATH.to_string())
            .into();

        let base_url = env::var("BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let max_file_size = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
            .parse::<u64>()
            .unwrap_or(MAX_FILE_SIZE_MB)
            * 1024
            * 1024;

        let allowed_extensions = env::var("ALLOWED_EXTENSIONS")
            .map(|s| parse_extension_list(&s))
            .unwrap_or_else(|_| parse_extension_list(DEFAULT_ALLOWED_EXTENSIONS));

        let max_concurrent_transforms = env::var("MAX_CONCURRENT_TRANSFORMS")
            .unwrap_or_else(|_| MAX_CONCURRENT_TRANSFORMS.to_string())
            .parse()
            .unwrap_or(MAX_CONCURRENT_TRANSFORMS);

        let sweep_grace_secs = env::var("SWEEP_GRACE_SECS")
            .unwrap_or_else(|_| SWEEP_GRACE_SECS.to_string())
            .parse()
            .unwrap_or(SWEEP_GRACE_SECS);

        let config = StorageConfig {
            upload_path,
            base_url,
            max_file_size,
            allowed_extensions,
            max_concurrent_transforms,
            sweep_grace_secs,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("BASE_URL must not be empty"));
        }
        if self.max_file_size == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than zero"));
        }
        if self.allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!("ALLOWED_EXTENSIONS must not be empty"));
        }
        if self.max_concurrent_transforms == 0 {
            return Err(anyhow::anyhow!(
                "MAX_CONCURRENT_TRANSFORMS must be greater than zero"
            ));
        }
        Ok(())
    }
}

/// Parse a comma-separated extension list into lowercase entries without
/// leading dots.
fn parse_extension_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_start_matches('.').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = StorageConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_file_size, 100 * 1024 * 1024);
        assert!(config.allowed_extensions.contains(&"jpg".to_string()));
        assert!(config.allowed_extensions.contains(&"ogg".to_string()));
    }

    #[test]
    fn test_parse_extension_list_normalizes_entries() {
        let parsed = parse_extension_list(" .JPG, png ,, .Webp ");
        assert_eq!(parsed, vec!["jpg", "png", "webp"]);
    }

    #[test]
    fn test_validate_rejects_empty_allow_list() {
        let config = StorageConfig {
            allowed_extensions: Vec::new(),
            ..StorageConfig::default()
        };
        assert!(config.validate().is_err());
    }
}

//! Data models and structures
//!
//! Defines the stored-object views exchanged with the storage layer, the
//! listing rows rendered by the index page, and the environment configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One object as reported by a bucket listing.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub key: String,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
    pub e_tag: Option<String>,
}

/// Body and content type of a fetched object.
#[derive(Debug, Clone)]
pub struct ObjectData {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Image,
    Other,
}

/// A row of the listing page.
#[derive(Debug, Clone, Serialize)]
pub struct FileEntry {
    pub key: String,
    /// Percent-encoded key, for use as a route path segment.
    pub path: String,
    pub display_name: String,
    pub kind: MediaKind,
    pub is_image: bool,
    pub size: u64,
    pub last_modified: Option<String>,
    pub url: String,
}

/// How the gateway hands an uploaded image to the vision model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageUrlMode {
    /// `<endpoint>/<bucket>/<key>`; the bucket must allow anonymous reads.
    Public,
    /// Time-limited presigned GET URL.
    Presigned,
}

impl std::str::FromStr for ImageUrlMode {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "presigned" => Ok(Self::Presigned),
            other => Err(crate::Error::Config(format!(
                "Invalid IMAGE_URL_MODE '{}'. Expected 'public' or 'presigned'",
                other
            ))),
        }
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_timeout: Duration,
    pub s3_endpoint: String,
    pub s3_access_key: String,
    pub s3_secret_key: String,
    pub s3_bucket: String,
    pub s3_region: String,
    pub s3_force_path_style: bool,
    pub default_voice: String,
    pub default_tts_model: String,
    pub vision_model: String,
    pub image_url_mode: ImageUrlMode,
    pub presign_expiry: Duration,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            openai_api_key: required("OPENAI_API_KEY")?,
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com".to_string()),
            openai_timeout: Duration::from_secs(parse_or("OPENAI_TIMEOUT_SECS", 60)?),
            s3_endpoint: required("S3_ENDPOINT_URL")?
                .trim_end_matches('/')
                .to_string(),
            s3_access_key: required("S3_ACCESS_KEY")?,
            s3_secret_key: required("S3_SECRET_KEY")?,
            s3_bucket: required("S3_BUCKET_NAME")?,
            s3_region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            s3_force_path_style: parse_or("S3_FORCE_PATH_STYLE", true)?,
            default_voice: std::env::var("TTS_DEFAULT_VOICE")
                .unwrap_or_else(|_| "alloy".to_string()),
            default_tts_model: std::env::var("TTS_DEFAULT_MODEL")
                .unwrap_or_else(|_| "tts-1".to_string()),
            vision_model: std::env::var("VISION_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            image_url_mode: match std::env::var("IMAGE_URL_MODE") {
                Ok(raw) => raw.parse()?,
                Err(_) => ImageUrlMode::Public,
            },
            presign_expiry: Duration::from_secs(parse_or("PRESIGN_EXPIRY_SECS", 3600)?),
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", 20 * 1024 * 1024)?,
        };

        check_presign_expiry(config.image_url_mode, config.presign_expiry)?;
        Ok(config)
    }
}

/// Longest lifetime SigV4 allows for a presigned URL.
pub const MAX_PRESIGN_EXPIRY: Duration = Duration::from_secs(7 * 24 * 3600);

/// Presigned mode needs an expiry S3 will sign; public mode ignores it.
pub fn check_presign_expiry(mode: ImageUrlMode, expiry: Duration) -> crate::Result<()> {
    if mode == ImageUrlMode::Presigned && (expiry.is_zero() || expiry > MAX_PRESIGN_EXPIRY) {
        return Err(crate::Error::Config(format!(
            "PRESIGN_EXPIRY_SECS must be between 1 and {} seconds, got {}",
            MAX_PRESIGN_EXPIRY.as_secs(),
            expiry.as_secs()
        )));
    }
    Ok(())
}

fn required(name: &str) -> crate::Result<String> {
    std::env::var(name).map_err(|_| crate::Error::Config(format!("{} not set", name)))
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> crate::Result<T> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| crate::Error::Config(format!("Invalid value for {}: '{}'", name, raw))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_url_mode_parsing() {
        assert_eq!(
            "public".parse::<ImageUrlMode>().unwrap(),
            ImageUrlMode::Public
        );
        assert_eq!(
            " Presigned ".parse::<ImageUrlMode>().unwrap(),
            ImageUrlMode::Presigned
        );
        assert!("signed".parse::<ImageUrlMode>().is_err());
    }

    #[test]
    fn test_presign_expiry_bounds() {
        let week = Duration::from_secs(7 * 24 * 3600);
        assert!(check_presign_expiry(ImageUrlMode::Presigned, Duration::from_secs(3600)).is_ok());
        assert!(check_presign_expiry(ImageUrlMode::Presigned, week).is_ok());

        let err = check_presign_expiry(ImageUrlMode::Presigned, week + Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
        assert!(err.to_string().contains("PRESIGN_EXPIRY_SECS"));
        assert!(check_presign_expiry(ImageUrlMode::Presigned, Duration::ZERO).is_err());
    }

    #[test]
    fn test_presign_expiry_ignored_in_public_mode() {
        let month = Duration::from_secs(30 * 24 * 3600);
        assert!(check_presign_expiry(ImageUrlMode::Public, month).is_ok());
    }

    #[test]
    fn test_media_kind_serialization() {
        let json = serde_json::to_string(&MediaKind::Image).unwrap();
        assert_eq!(json, "\"image\"");
    }
}

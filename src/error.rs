//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.
//! [`Error`] covers the transport level (HTTP, S3, config); [`GatewayError`]
//! tags a failure with the request phase it happened in.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("S3 error: {0}")]
    Storage(String),

    #[error("AI provider error: {0}")]
    AiProvider(String),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure of one step of a gateway operation.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Text not provided")]
    MissingText,

    #[error("Image not provided")]
    MissingImage,

    #[error("Failed to convert text to audio: {0}")]
    Speech(#[source] Error),

    #[error("Failed to upload audio to the S3 bucket: {0}")]
    UploadAudio(#[source] Error),

    #[error("Failed to upload image to the S3 bucket: {0}")]
    UploadImage(#[source] Error),

    #[error("Failed to build image URL: {0}")]
    ImageUrl(#[source] Error),

    #[error("Failed to describe image: {0}")]
    Describe(#[source] Error),

    #[error("Failed to fetch file from the S3 bucket: {0}")]
    Fetch(#[source] Error),

    #[error("Failed to delete file from the S3 bucket: {0}")]
    Delete(#[source] Error),
}

impl GatewayError {
    /// Whether the failure was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingText | Self::MissingImage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_message_embeds_cause() {
        let err = GatewayError::UploadAudio(Error::Storage("access denied".to_string()));
        assert_eq!(
            err.to_string(),
            "Failed to upload audio to the S3 bucket: S3 error: access denied"
        );
    }

    #[test]
    fn test_missing_input_is_client_error() {
        assert!(GatewayError::MissingText.is_client_error());
        assert!(GatewayError::MissingImage.is_client_error());
        assert!(!GatewayError::Describe(Error::AiProvider("x".into())).is_client_error());
    }
}

//! Object storage for generated and uploaded media
//!
//! Handles reading and writing objects in a single bucket on any
//! S3-compatible endpoint (NooBaa, MinIO, DigitalOcean Spaces, AWS).

pub mod mock;
pub mod s3;

pub use mock::MockStorageClient;
pub use s3::S3StorageClient;

use crate::keys;
use crate::models::{ObjectData, StoredObject};
use crate::Result;
use async_trait::async_trait;
use std::time::Duration;

/// S3 user-metadata key linking description audio to its source image.
pub const SOURCE_IMAGE_METADATA: &str = "source-image";

#[async_trait]
pub trait StorageService: Send + Sync {
    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
        metadata: &[(&str, &str)],
    ) -> Result<()>;
    async fn get_object(&self, key: &str) -> Result<ObjectData>;
    /// Every object in the bucket, in a single unpaginated request.
    async fn list_objects(&self) -> Result<Vec<StoredObject>>;
    /// Deleting a missing key succeeds, as `DeleteObject` does.
    async fn delete_object(&self, key: &str) -> Result<()>;
    /// Path-style URL for anonymous reads.
    fn object_url(&self, key: &str) -> String;
    async fn presigned_url(&self, key: &str, expires_in: Duration) -> Result<String>;
}

/// `<endpoint>/<bucket>/<key>`, with the key percent-encoded.
pub fn path_style_url(endpoint: &str, bucket: &str, key: &str) -> String {
    format!(
        "{}/{}/{}",
        endpoint.trim_end_matches('/'),
        bucket,
        keys::url_encode(key)
    )
}

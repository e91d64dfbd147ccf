use super::{path_style_url, StorageService};
use crate::models::{ObjectData, StoredObject};
use crate::{Error, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{config::Region, Client as S3Client};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;

pub struct S3StorageClient {
    client: S3Client,
    bucket: String,
    endpoint: String,
}

impl S3StorageClient {
    pub async fn new(
        access_key_id: String,
        secret_access_key: String,
        endpoint: String,
        bucket: String,
        region: String,
        force_path_style: bool,
    ) -> Result<Self> {
        let credentials = aws_sdk_s3::config::Credentials::new(
            access_key_id,
            secret_access_key,
            None,
            None,
            "media-gateway",
        );

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(Region::new(region))
            .endpoint_url(&endpoint)
            .load()
            .await;

        // NooBaa and MinIO only answer path-style requests.
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(force_path_style)
            .build();

        Ok(Self {
            client: S3Client::from_conf(s3_config),
            bucket,
            endpoint,
        })
    }
}

fn storage_error<E>(action: &str, key: &str, err: E) -> Error
where
    E: std::error::Error,
{
    Error::Storage(format!("Failed to {} '{}': {}", action, key, DisplayErrorContext(err)))
}

#[async_trait]
impl StorageService for S3StorageClient {
    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
        metadata: &[(&str, &str)],
    ) -> Result<()> {
        let size = data.len();
        let metadata: HashMap<String, String> = metadata
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .set_metadata((!metadata.is_empty()).then_some(metadata))
            .send()
            .await
            .map_err(|e| storage_error("upload", key, e))?;

        tracing::info!("Stored {} ({} bytes, {})", key, size, content_type);
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<ObjectData> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| storage_error("read", key, e))?;

        let content_type = response.content_type().map(str::to_string);
        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| storage_error("read body of", key, e))?
            .into_bytes()
            .to_vec();

        Ok(ObjectData {
            bytes,
            content_type,
        })
    }

    async fn list_objects(&self) -> Result<Vec<StoredObject>> {
        let response = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| storage_error("list", &self.bucket, e))?;

        Ok(response
            .contents()
            .iter()
            .filter_map(|object| {
                Some(StoredObject {
                    key: object.key()?.to_string(),
                    size: object.size().unwrap_or(0).max(0) as u64,
                    last_modified: object.last_modified().and_then(|modified| {
                        DateTime::<Utc>::from_timestamp(modified.secs(), modified.subsec_nanos())
                    }),
                    e_tag: object.e_tag().map(str::to_string),
                })
            })
            .collect())
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| storage_error("delete", key, e))?;

        tracing::info!("Deleted {}", key);
        Ok(())
    }

    fn object_url(&self, key: &str) -> String {
        path_style_url(&self.endpoint, &self.bucket, key)
    }

    async fn presigned_url(&self, key: &str, expires_in: Duration) -> Result<String> {
        let config = PresigningConfig::expires_in(expires_in)
            .map_err(|e| storage_error("presign", key, e))?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(config)
            .await
            .map_err(|e| storage_error("presign", key, e))?;

        Ok(request.uri().to_string())
    }
}

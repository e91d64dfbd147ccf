use super::{path_style_url, StorageService};
use crate::models::{ObjectData, StoredObject};
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct MockObject {
    pub data: Vec<u8>,
    pub content_type: String,
    pub metadata: HashMap<String, String>,
}

#[derive(Default)]
struct Failures {
    put: Option<String>,
    put_keys: HashMap<String, String>,
    presign: Option<String>,
    get: Option<String>,
    list: Option<String>,
    delete: Option<String>,
}

/// In-memory bucket. Keys are kept sorted, matching `ListObjectsV2` ordering.
#[derive(Clone)]
pub struct MockStorageClient {
    objects: Arc<Mutex<BTreeMap<String, MockObject>>>,
    endpoint: String,
    bucket: String,
    failures: Arc<Mutex<Failures>>,
    put_count: Arc<Mutex<usize>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockStorageClient {
    pub fn new() -> Self {
        Self {
            objects: Arc::new(Mutex::new(BTreeMap::new())),
            endpoint: "https://mock-s3.example.com".to_string(),
            bucket: "media".to_string(),
            failures: Arc::new(Mutex::new(Failures::default())),
            put_count: Arc::new(Mutex::new(0)),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_endpoint(mut self, endpoint: String, bucket: String) -> Self {
        self.endpoint = endpoint;
        self.bucket = bucket;
        self
    }

    pub fn with_object(self, key: &str, data: Vec<u8>, content_type: &str) -> Self {
        self.objects.lock().unwrap().insert(
            key.to_string(),
            MockObject {
                data,
                content_type: content_type.to_string(),
                metadata: HashMap::new(),
            },
        );
        self
    }

    pub fn with_put_failure(self, message: &str) -> Self {
        self.failures.lock().unwrap().put = Some(message.to_string());
        self
    }

    /// Fail puts of one key only.
    pub fn with_put_failure_for(self, key: &str, message: &str) -> Self {
        self.failures
            .lock()
            .unwrap()
            .put_keys
            .insert(key.to_string(), message.to_string());
        self
    }

    pub fn with_presign_failure(self, message: &str) -> Self {
        self.failures.lock().unwrap().presign = Some(message.to_string());
        self
    }

    pub fn with_get_failure(self, message: &str) -> Self {
        self.failures.lock().unwrap().get = Some(message.to_string());
        self
    }

    pub fn with_list_failure(self, message: &str) -> Self {
        self.failures.lock().unwrap().list = Some(message.to_string());
        self
    }

    pub fn with_delete_failure(self, message: &str) -> Self {
        self.failures.lock().unwrap().delete = Some(message.to_string());
        self
    }

    pub fn get_put_count(&self) -> usize {
        *self.put_count.lock().unwrap()
    }

    /// Calls of any kind that reached the bucket.
    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn get_object_record(&self, key: &str) -> Option<MockObject> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn get_keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    fn record_call(&self) {
        *self.call_count.lock().unwrap() += 1;
    }
}

impl Default for MockStorageClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageService for MockStorageClient {
    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
        metadata: &[(&str, &str)],
    ) -> Result<()> {
        self.record_call();
        *self.put_count.lock().unwrap() += 1;

        {
            let failures = self.failures.lock().unwrap();
            if let Some(message) = failures.put.as_ref().or(failures.put_keys.get(key)) {
                return Err(Error::Storage(message.clone()));
            }
        }

        self.objects.lock().unwrap().insert(
            key.to_string(),
            MockObject {
                data,
                content_type: content_type.to_string(),
                metadata: metadata
                    .iter()
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .collect(),
            },
        );
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<ObjectData> {
        self.record_call();

        if let Some(message) = &self.failures.lock().unwrap().get {
            return Err(Error::Storage(message.clone()));
        }

        match self.objects.lock().unwrap().get(key) {
            Some(object) => Ok(ObjectData {
                bytes: object.data.clone(),
                content_type: Some(object.content_type.clone()),
            }),
            None => Err(Error::Storage(format!("NoSuchKey: {}", key))),
        }
    }

    async fn list_objects(&self) -> Result<Vec<StoredObject>> {
        self.record_call();

        if let Some(message) = &self.failures.lock().unwrap().list {
            return Err(Error::Storage(message.clone()));
        }

        Ok(self
            .objects
            .lock()
            .unwrap()
            .iter()
            .map(|(key, object)| StoredObject {
                key: key.clone(),
                size: object.data.len() as u64,
                last_modified: Some(Utc::now()),
                e_tag: None,
            })
            .collect())
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        self.record_call();

        if let Some(message) = &self.failures.lock().unwrap().delete {
            return Err(Error::Storage(message.clone()));
        }

        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    fn object_url(&self, key: &str) -> String {
        path_style_url(&self.endpoint, &self.bucket, key)
    }

    async fn presigned_url(&self, key: &str, expires_in: Duration) -> Result<String> {
        self.record_call();

        if let Some(message) = &self.failures.lock().unwrap().presign {
            return Err(Error::Storage(message.clone()));
        }

        Ok(format!(
            "{}?X-Amz-Expires={}&X-Amz-Signature=mock",
            self.object_url(key),
            expires_in.as_secs()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SOURCE_IMAGE_METADATA;

    #[tokio::test]
    async fn test_mock_put_and_get() {
        let storage = MockStorageClient::new();

        storage
            .put_object("a.mp3", vec![1, 2, 3], "audio/mpeg", &[])
            .await
            .unwrap();

        let object = storage.get_object("a.mp3").await.unwrap();
        assert_eq!(object.bytes, vec![1, 2, 3]);
        assert_eq!(object.content_type.as_deref(), Some("audio/mpeg"));
        assert_eq!(storage.get_put_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_put_records_metadata() {
        let storage = MockStorageClient::new();

        storage
            .put_object(
                "cat_desc.mp3",
                vec![1],
                "audio/mpeg",
                &[(SOURCE_IMAGE_METADATA, "cat.jpg")],
            )
            .await
            .unwrap();

        let record = storage.get_object_record("cat_desc.mp3").unwrap();
        assert_eq!(
            record.metadata.get(SOURCE_IMAGE_METADATA).map(String::as_str),
            Some("cat.jpg")
        );
    }

    #[tokio::test]
    async fn test_mock_list_is_sorted() {
        let storage = MockStorageClient::new()
            .with_object("b.mp3", vec![1], "audio/mpeg")
            .with_object("a.jpg", vec![1, 2], "image/jpeg");

        let listed = storage.list_objects().await.unwrap();
        let keys: Vec<_> = listed.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["a.jpg", "b.mp3"]);
        assert_eq!(listed[0].size, 2);
    }

    #[tokio::test]
    async fn test_mock_get_missing_key() {
        let storage = MockStorageClient::new();
        let err = storage.get_object("missing.mp3").await.unwrap_err();
        assert!(err.to_string().contains("NoSuchKey"));
    }

    #[tokio::test]
    async fn test_mock_delete_missing_key_succeeds() {
        let storage = MockStorageClient::new();
        storage.delete_object("missing.mp3").await.unwrap();
    }

    #[tokio::test]
    async fn test_mock_put_failure_for_single_key() {
        let storage = MockStorageClient::new().with_put_failure_for("b.mp3", "quota");

        storage
            .put_object("a.jpg", vec![1], "image/jpeg", &[])
            .await
            .unwrap();
        let err = storage
            .put_object("b.mp3", vec![1], "audio/mpeg", &[])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("quota"));
        assert_eq!(storage.get_keys(), vec!["a.jpg".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_failures() {
        let storage = MockStorageClient::new()
            .with_put_failure("denied")
            .with_list_failure("unreachable");

        assert!(storage
            .put_object("a", vec![], "audio/mpeg", &[])
            .await
            .is_err());
        assert!(storage.list_objects().await.is_err());
        assert!(storage.get_keys().is_empty());
    }
}

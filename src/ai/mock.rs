use super::{SpeechRequest, SpeechService, VisionService};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Minimal MPEG audio frame header, enough for players to recognise the type.
const DEFAULT_AUDIO: &[u8] = &[0xFF, 0xFB, 0x90, 0x44, 0x00, 0x00, 0x00, 0x00];

#[derive(Clone)]
pub struct MockSpeechClient {
    audio_responses: Arc<Mutex<Vec<Vec<u8>>>>,
    requests: Arc<Mutex<Vec<SpeechRequest>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl MockSpeechClient {
    pub fn new() -> Self {
        Self {
            audio_responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_audio_response(self, response: Vec<u8>) -> Self {
        self.audio_responses.lock().unwrap().push(response);
        self
    }

    pub fn with_failure(self, message: &str) -> Self {
        *self.failure.lock().unwrap() = Some(message.to_string());
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn get_requests(&self) -> Vec<SpeechRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockSpeechClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechService for MockSpeechClient {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>> {
        let mut requests = self.requests.lock().unwrap();
        requests.push(request.clone());

        if let Some(message) = self.failure.lock().unwrap().as_ref() {
            return Err(Error::AiProvider(message.clone()));
        }

        let responses = self.audio_responses.lock().unwrap();
        if responses.is_empty() {
            Ok(DEFAULT_AUDIO.to_vec())
        } else {
            let index = (requests.len() - 1) % responses.len();
            Ok(responses[index].clone())
        }
    }
}

#[derive(Clone)]
pub struct MockVisionClient {
    description_responses: Arc<Mutex<Vec<String>>>,
    image_urls: Arc<Mutex<Vec<String>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl MockVisionClient {
    pub fn new() -> Self {
        Self {
            description_responses: Arc::new(Mutex::new(Vec::new())),
            image_urls: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_description_response(self, response: String) -> Self {
        self.description_responses.lock().unwrap().push(response);
        self
    }

    pub fn with_failure(self, message: &str) -> Self {
        *self.failure.lock().unwrap() = Some(message.to_string());
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.image_urls.lock().unwrap().len()
    }

    /// URLs passed to `describe_image`, in call order.
    pub fn get_image_urls(&self) -> Vec<String> {
        self.image_urls.lock().unwrap().clone()
    }
}

impl Default for MockVisionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VisionService for MockVisionClient {
    async fn describe_image(&self, image_url: &str) -> Result<String> {
        let mut urls = self.image_urls.lock().unwrap();
        urls.push(image_url.to_string());

        if let Some(message) = self.failure.lock().unwrap().as_ref() {
            return Err(Error::AiProvider(message.clone()));
        }

        let responses = self.description_responses.lock().unwrap();
        if responses.is_empty() {
            Ok(format!("An image located at {}", image_url))
        } else {
            let index = (urls.len() - 1) % responses.len();
            Ok(responses[index].clone())
        }
    }
}

//! OpenAI text-to-speech client.
//!
//! Uses `/v1/audio/speech` with `response_format=mp3`; the response body is
//! the encoded audio itself.

use super::client::OpenAiHttpClient;
use super::types::SpeechApiRequest;
use crate::ai::{SpeechRequest, SpeechService};
use crate::{Error, Result};
use async_trait::async_trait;

const SPEECH_PATH: &str = "/v1/audio/speech";

pub struct OpenAiSpeechClient {
    http: OpenAiHttpClient,
}

impl OpenAiSpeechClient {
    pub fn new_with_client(api_key: String, client: reqwest::Client) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(api_key, client),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }
}

#[async_trait]
impl SpeechService for OpenAiSpeechClient {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>> {
        tracing::debug!(
            "Synthesizing {} chars (model: {}, voice: {})",
            request.input.len(),
            request.model,
            request.voice
        );

        let body = SpeechApiRequest {
            model: request.model.clone(),
            input: request.input.clone(),
            voice: request.voice.clone(),
            response_format: "mp3".to_string(),
        };

        let audio = self.http.post_bytes(SPEECH_PATH, &body).await?;
        if audio.is_empty() {
            return Err(Error::AiProvider(
                "Empty audio in OpenAI speech response".to_string(),
            ));
        }

        Ok(audio)
    }
}

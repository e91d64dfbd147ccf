use super::types::{ChatCompletionRequest, ChatCompletionResponse};
use crate::{Error, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Shared transport for the OpenAI REST endpoints.
#[derive(Clone)]
pub struct OpenAiHttpClient {
    pub(crate) client: Client,
    pub(crate) api_key: String,
    pub(crate) base_url: String,
}

impl OpenAiHttpClient {
    pub fn new_with_client(api_key: String, client: Client) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn send<Req: Serialize>(&self, path: &str, request: &Req) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to OpenAI: {}", e);
                e
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            tracing::error!("OpenAI API error (status {}): {}", status, error_text);
            return Err(Error::AiProvider(format!(
                "OpenAI API error (status {}): {}",
                status, error_text
            )));
        }

        Ok(response)
    }

    pub async fn post<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        path: &str,
        request: &Req,
    ) -> Result<Resp> {
        let body = self.send(path, request).await?.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse OpenAI response: {}\nBody: {}", e, body);
            Error::Serialization(e)
        })
    }

    /// POST a JSON request and return the raw response body.
    pub async fn post_bytes<Req: Serialize>(&self, path: &str, request: &Req) -> Result<Vec<u8>> {
        Ok(self.send(path, request).await?.bytes().await?.to_vec())
    }

    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        self.post("/v1/chat/completions", request).await
    }
}

use super::client::OpenAiHttpClient;
use super::types::{ChatCompletionRequest, ChatMessage, ChatMessageContent, MessagePart};
use crate::ai::VisionService;
use crate::{prompts, Error, Result};
use async_trait::async_trait;

/// Image description through a vision-capable chat model.
pub struct OpenAiVisionClient {
    http: OpenAiHttpClient,
    model: String,
}

impl OpenAiVisionClient {
    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(api_key, client),
            model,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }
}

#[async_trait]
impl VisionService for OpenAiVisionClient {
    async fn describe_image(&self, image_url: &str) -> Result<String> {
        tracing::debug!("Requesting description for {}", image_url);

        let system_message = ChatMessage {
            role: "system".to_string(),
            content: Some(ChatMessageContent::Text(prompts::VISION_SYSTEM.to_string())),
        };

        let user_message = ChatMessage {
            role: "user".to_string(),
            content: Some(ChatMessageContent::Parts(vec![
                MessagePart::text(prompts::VISION_USER),
                MessagePart::image_url(image_url),
            ])),
        };

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![system_message, user_message],
            max_completion_tokens: 500,
        };

        let response = self.http.chat_completion(&request).await?;

        let choice = response.choices.first();
        if let Some(reason) = choice.and_then(|c| c.finish_reason.as_deref()) {
            if reason == "length" {
                tracing::warn!("Image description was cut off at the token limit");
            } else {
                tracing::debug!("Description finished: {}", reason);
            }
        }

        choice
            .and_then(|choice| match &choice.message.content {
                Some(ChatMessageContent::Text(text)) if !text.trim().is_empty() => {
                    Some(text.trim().to_string())
                }
                _ => None,
            })
            .ok_or_else(|| Error::AiProvider("No description in OpenAI chat response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::openai::test_support;
    use wiremock::matchers::{body_string_contains, header};
    use wiremock::{MockServer, ResponseTemplate};

    fn make_client(server: &MockServer, model: &str) -> OpenAiVisionClient {
        OpenAiVisionClient::new_with_client(
            "test-key".to_string(),
            model.to_string(),
            reqwest::Client::new(),
        )
        .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_describe_image_parses_response() {
        let server = MockServer::start().await;

        test_support::post(test_support::CHAT_COMPLETIONS_PATH)
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": "  A tabby cat asleep on a windowsill.  "
                    },
                    "finish_reason": "stop"
                }]
            })))
            .mount(&server)
            .await;

        let description = make_client(&server, "gpt-4o-mini")
            .describe_image("https://s3.local/media/cat.jpg")
            .await
            .unwrap();
        assert_eq!(description, "A tabby cat asleep on a windowsill.");
    }

    #[tokio::test]
    async fn test_describe_image_sends_url_and_model() {
        let server = MockServer::start().await;

        test_support::post(test_support::CHAT_COMPLETIONS_PATH)
            .and(body_string_contains("\"model\":\"custom-vision\""))
            .and(body_string_contains(
                "\"image_url\":{\"url\":\"https://s3.local/media/cat.jpg\"}",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{
                    "message": { "role": "assistant", "content": "a cat" },
                    "finish_reason": "stop"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        make_client(&server, "custom-vision")
            .describe_image("https://s3.local/media/cat.jpg")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_describe_image_rejects_empty_choices() {
        let server = MockServer::start().await;

        test_support::post(test_support::CHAT_COMPLETIONS_PATH)
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": []
            })))
            .mount(&server)
            .await;

        let err = make_client(&server, "gpt-4o-mini")
            .describe_image("https://s3.local/x.jpg")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
    }

    #[tokio::test]
    async fn test_describe_image_unparseable_body_is_serialization_error() {
        let server = MockServer::start().await;

        test_support::post(test_support::CHAT_COMPLETIONS_PATH)
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let err = make_client(&server, "gpt-4o-mini")
            .describe_image("https://s3.local/x.jpg")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[tokio::test]
    async fn test_describe_image_truncated_description_is_still_returned() {
        let server = MockServer::start().await;

        test_support::post(test_support::CHAT_COMPLETIONS_PATH)
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{
                    "message": { "role": "assistant", "content": "A long scene with" },
                    "finish_reason": "length"
                }]
            })))
            .mount(&server)
            .await;

        let description = make_client(&server, "gpt-4o-mini")
            .describe_image("https://s3.local/x.jpg")
            .await
            .unwrap();
        assert_eq!(description, "A long scene with");
    }

    #[tokio::test]
    async fn test_describe_image_api_error_returns_ai_provider_error() {
        let server = MockServer::start().await;

        test_support::post(test_support::CHAT_COMPLETIONS_PATH)
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid image url"))
            .mount(&server)
            .await;

        let err = make_client(&server, "gpt-4o-mini")
            .describe_image("https://s3.local/x.jpg")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
        assert!(err.to_string().contains("invalid image url"));
    }
}

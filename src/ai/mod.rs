//! Generative-AI service integration
//!
//! Provides interfaces to OpenAI's speech and chat-completion APIs for
//! synthesizing audio from text and describing uploaded images.

pub mod mock;
pub mod openai;

pub use mock::{MockSpeechClient, MockVisionClient};
pub use openai::{OpenAiSpeechClient, OpenAiVisionClient};

use crate::Result;
use async_trait::async_trait;

/// Voices offered by the index page.
pub const VOICES: &[&str] = &["alloy", "echo", "fable", "onyx", "nova", "shimmer"];

/// Speech models offered by the index page.
pub const TTS_MODELS: &[&str] = &["tts-1", "tts-1-hd", "gpt-4o-mini-tts"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechRequest {
    pub input: String,
    pub voice: String,
    pub model: String,
}

#[async_trait]
pub trait SpeechService: Send + Sync {
    /// Synthesize `request.input` and return MP3 bytes.
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>>;
}

#[async_trait]
pub trait VisionService: Send + Sync {
    /// Describe the image reachable at `image_url`.
    async fn describe_image(&self, image_url: &str) -> Result<String>;
}

pub mod client;
pub mod speech;
pub mod types;
pub mod vision;

pub use client::OpenAiHttpClient;
pub use speech::OpenAiSpeechClient;
pub use vision::OpenAiVisionClient;

//! Request orchestration: speech generation, image description and the
//! bucket operations behind each route.
//!
//! Every operation is a flat sequence of external calls. A failing step is
//! reported as the [`GatewayError`] variant naming it; earlier steps are not
//! rolled back.

use crate::ai::{
    OpenAiSpeechClient, OpenAiVisionClient, SpeechRequest, SpeechService, VisionService,
};
use crate::error::GatewayError;
use crate::keys;
use crate::models::{Config, FileEntry, ImageUrlMode, ObjectData};
use crate::storage::{S3StorageClient, StorageService, SOURCE_IMAGE_METADATA};
use crate::Result;
use chrono::Utc;
use std::time::Duration;
use tracing::{info, warn};

const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";
const IMAGE_CONTENT_TYPE: &str = "image/jpeg";

/// Coordinates the generation API and the bucket for each route.
pub struct Gateway {
    speech: Box<dyn SpeechService>,
    vision: Box<dyn VisionService>,
    storage: Box<dyn StorageService>,
    settings: GatewaySettings,
}

/// Injectable service bundle used to construct [`Gateway`] in tests.
pub struct GatewayServices {
    pub speech: Box<dyn SpeechService>,
    pub vision: Box<dyn VisionService>,
    pub storage: Box<dyn StorageService>,
}

#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub default_voice: String,
    pub default_model: String,
    pub image_url_mode: ImageUrlMode,
    pub presign_expiry: Duration,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            default_voice: "alloy".to_string(),
            default_model: "tts-1".to_string(),
            image_url_mode: ImageUrlMode::Public,
            presign_expiry: Duration::from_secs(3600),
        }
    }
}

impl From<&Config> for GatewaySettings {
    fn from(config: &Config) -> Self {
        Self {
            default_voice: config.default_voice.clone(),
            default_model: config.default_tts_model.clone(),
            image_url_mode: config.image_url_mode,
            presign_expiry: config.presign_expiry,
        }
    }
}

/// Input of the text-to-speech route. Blank optional fields count as absent.
#[derive(Debug, Clone, Default)]
pub struct TextToSpeech {
    pub text: String,
    pub voice: Option<String>,
    pub model: Option<String>,
    pub filename: Option<String>,
}

/// Input of the image-description route.
#[derive(Debug, Clone, Default)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub filename: Option<String>,
    pub voice: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribedImage {
    pub image_key: String,
    pub audio_key: String,
    pub description: String,
}

impl Gateway {
    pub fn with_services(services: GatewayServices, settings: GatewaySettings) -> Self {
        Self {
            speech: services.speech,
            vision: services.vision,
            storage: services.storage,
            settings,
        }
    }

    /// Construct a gateway from environment configuration (`Config::from_env`).
    pub async fn new(config: &Config) -> Result<Self> {
        // One connection pool for both OpenAI clients.
        let http_client = reqwest::Client::builder()
            .timeout(config.openai_timeout)
            .build()?;

        let speech = OpenAiSpeechClient::new_with_client(
            config.openai_api_key.clone(),
            http_client.clone(),
        )
        .with_base_url(config.openai_base_url.clone());

        let vision = OpenAiVisionClient::new_with_client(
            config.openai_api_key.clone(),
            config.vision_model.clone(),
            http_client,
        )
        .with_base_url(config.openai_base_url.clone());
        info!("Vision model: {}", config.vision_model);

        let storage = S3StorageClient::new(
            config.s3_access_key.clone(),
            config.s3_secret_key.clone(),
            config.s3_endpoint.clone(),
            config.s3_bucket.clone(),
            config.s3_region.clone(),
            config.s3_force_path_style,
        )
        .await?;
        info!(
            "Storage: bucket '{}' at {}",
            config.s3_bucket, config.s3_endpoint
        );

        Ok(Self::with_services(
            GatewayServices {
                speech: Box::new(speech),
                vision: Box::new(vision),
                storage: Box::new(storage),
            },
            GatewaySettings::from(config),
        ))
    }

    pub fn settings(&self) -> &GatewaySettings {
        &self.settings
    }

    /// Synthesize `request.text` and store it; returns the object key.
    pub async fn generate_audio(
        &self,
        request: TextToSpeech,
    ) -> std::result::Result<String, GatewayError> {
        if request.text.trim().is_empty() {
            return Err(GatewayError::MissingText);
        }

        let audio = self
            .synthesize(request.text, request.voice, request.model)
            .await?;

        let key = keys::audio_key(request.filename.as_deref(), Utc::now());
        self.storage
            .put_object(&key, audio, AUDIO_CONTENT_TYPE, &[])
            .await
            .map_err(GatewayError::UploadAudio)?;

        info!("Generated audio {}", key);
        Ok(key)
    }

    /// Store an image, describe it, and store the spoken description next to it.
    pub async fn describe_image(
        &self,
        upload: ImageUpload,
    ) -> std::result::Result<DescribedImage, GatewayError> {
        if upload.bytes.is_empty() {
            return Err(GatewayError::MissingImage);
        }

        let image_key = keys::image_key(upload.filename.as_deref(), Utc::now());
        let size = upload.bytes.len();
        self.storage
            .put_object(&image_key, upload.bytes, IMAGE_CONTENT_TYPE, &[])
            .await
            .map_err(GatewayError::UploadImage)?;
        info!("Uploaded image {} ({} bytes)", image_key, size);

        let image_url = self.image_url(&image_key).await?;

        let description = self
            .vision
            .describe_image(&image_url)
            .await
            .map_err(GatewayError::Describe)?;
        info!(
            "Described {} ({} chars)",
            image_key,
            description.chars().count()
        );

        let audio = self
            .synthesize(description.clone(), upload.voice, upload.model)
            .await?;

        let audio_key = keys::description_audio_key(&image_key);
        self.storage
            .put_object(
                &audio_key,
                audio,
                AUDIO_CONTENT_TYPE,
                &[(SOURCE_IMAGE_METADATA, image_key.as_str())],
            )
            .await
            .map_err(GatewayError::UploadAudio)?;
        info!("Generated description audio {}", audio_key);

        Ok(DescribedImage {
            image_key,
            audio_key,
            description,
        })
    }

    /// Listing rows for the index page. A failed listing yields no rows.
    pub async fn list_files(&self) -> Vec<FileEntry> {
        let objects = match self.storage.list_objects().await {
            Ok(objects) => objects,
            Err(e) => {
                warn!("Could not list bucket objects: {}", e);
                return Vec::new();
            }
        };

        objects
            .into_iter()
            .map(|object| {
                let kind = keys::media_kind(&object.key);
                FileEntry {
                    path: keys::url_encode(&object.key),
                    display_name: keys::display_name(&object.key),
                    is_image: keys::is_image(&object.key),
                    kind,
                    size: object.size,
                    last_modified: object
                        .last_modified
                        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
                    url: self.storage.object_url(&object.key),
                    key: object.key,
                }
            })
            .collect()
    }

    pub async fn fetch_file(&self, key: &str) -> std::result::Result<ObjectData, GatewayError> {
        let mut object = self
            .storage
            .get_object(key)
            .await
            .map_err(GatewayError::Fetch)?;

        if object.content_type.is_none() {
            object.content_type = Some(keys::content_type_for(key).to_string());
        }
        Ok(object)
    }

    pub async fn delete_file(&self, key: &str) -> std::result::Result<(), GatewayError> {
        self.storage
            .delete_object(key)
            .await
            .map_err(GatewayError::Delete)
    }

    async fn synthesize(
        &self,
        text: String,
        voice: Option<String>,
        model: Option<String>,
    ) -> std::result::Result<Vec<u8>, GatewayError> {
        let request = SpeechRequest {
            input: text,
            voice: or_default(voice, &self.settings.default_voice),
            model: or_default(model, &self.settings.default_model),
        };

        self.speech
            .synthesize(&request)
            .await
            .map_err(GatewayError::Speech)
    }

    async fn image_url(&self, key: &str) -> std::result::Result<String, GatewayError> {
        match self.settings.image_url_mode {
            ImageUrlMode::Public => Ok(self.storage.object_url(key)),
            ImageUrlMode::Presigned => self
                .storage
                .presigned_url(key, self.settings.presign_expiry)
                .await
                .map_err(GatewayError::ImageUrl),
        }
    }
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

//! Image upload and description route

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::response::Redirect;

use super::ApiError;
use crate::error::GatewayError;
use crate::gateway::ImageUpload;
use crate::state::AppState;

/// Multipart fields: `image` (file), and optional `filename`, `voice`, `model`.
/// A request without a multipart body carries no image.
pub async fn analyze_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Redirect, ApiError> {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            tracing::debug!("No multipart body: {}", rejection.body_text());
            return Err(GatewayError::MissingImage.into());
        }
    };

    let mut upload = ImageUpload::default();
    let mut uploaded_name = None;
    let mut filename_override = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                uploaded_name = field.file_name().map(str::to_string);
                upload.bytes = field.bytes().await?.to_vec();
            }
            "filename" => filename_override = Some(field.text().await?),
            "voice" => upload.voice = Some(field.text().await?),
            "model" => upload.model = Some(field.text().await?),
            other => tracing::debug!("Ignoring multipart field '{}'", other),
        }
    }

    upload.filename = filename_override
        .filter(|name| !name.trim().is_empty())
        .or(uploaded_name);

    let described = state.gateway.describe_image(upload).await?;
    tracing::info!(
        "Image {} described as {}",
        described.image_key,
        described.audio_key
    );

    Ok(Redirect::to("/"))
}

//! Speech generation and stored-object routes

use axum::extract::{FromRequest, Multipart, Path, Request, State};
use axum::http::header;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;

use super::ApiError;
use crate::gateway::TextToSpeech;
use crate::keys;
use crate::state::AppState;

/// Fields of the text-to-speech form.
///
/// Read from a urlencoded or multipart body. Any other body, including an
/// empty one, counts as a form without fields.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateAudioForm {
    #[serde(default)]
    pub text: String,
    pub voice: Option<String>,
    pub model: Option<String>,
    pub filename: Option<String>,
}

impl<S> FromRequest<S> for GenerateAudioForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let mut multipart = Multipart::from_request(req, state).await?;
            let mut form = GenerateAudioForm::default();
            while let Some(field) = multipart.next_field().await? {
                let name = field.name().unwrap_or_default().to_string();
                let value = field.text().await?;
                match name.as_str() {
                    "text" => form.text = value,
                    "voice" => form.voice = Some(value),
                    "model" => form.model = Some(value),
                    "filename" => form.filename = Some(value),
                    other => tracing::debug!("Ignoring form field '{}'", other),
                }
            }
            Ok(form)
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(form) = Form::<GenerateAudioForm>::from_request(req, state).await?;
            Ok(form)
        } else {
            Ok(GenerateAudioForm::default())
        }
    }
}

pub async fn generate_audio(
    State(state): State<AppState>,
    form: GenerateAudioForm,
) -> Result<Redirect, ApiError> {
    state
        .gateway
        .generate_audio(TextToSpeech {
            text: form.text,
            voice: form.voice,
            model: form.model,
            filename: form.filename,
        })
        .await?;

    Ok(Redirect::to("/"))
}

pub async fn play_audio(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    serve_object(&state, &filename, "inline").await
}

pub async fn download_audio(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    serve_object(&state, &filename, "attachment").await
}

pub async fn delete_audio(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Redirect, ApiError> {
    state.gateway.delete_file(&filename).await?;
    tracing::info!("Deleted {}", filename);
    Ok(Redirect::to("/"))
}

async fn serve_object(
    state: &AppState,
    key: &str,
    disposition: &str,
) -> Result<Response, ApiError> {
    let object = state.gateway.fetch_file(key).await?;
    let content_type = object
        .content_type
        .unwrap_or_else(|| keys::content_type_for(key).to_string());

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (
                header::CONTENT_DISPOSITION,
                format!("{}; filename=\"{}\"", disposition, header_filename(key)),
            ),
        ],
        object.bytes,
    )
        .into_response())
}

/// Key reduced to characters that are safe inside a quoted header parameter.
fn header_filename(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c == ' ' || c.is_ascii_graphic() => c,
            _ => '_',
        })
        .collect()
}

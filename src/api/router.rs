use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use super::{audio, images, index};
use crate::state::AppState;

/// Create the main router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index::index))
        .route("/health", get(index::health))
        .route("/generate-audio", post(audio::generate_audio))
        // Three names for one upload-describe-speak sequence.
        .route("/analyze-image", post(images::analyze_image))
        .route("/upload-image", post(images::analyze_image))
        .route("/generate-image-audio", post(images::analyze_image))
        .route("/play-audio/{filename}", get(audio::play_audio))
        .route("/download-audio/{filename}", get(audio::download_audio))
        .route("/download/{filename}", get(audio::download_audio))
        .route("/delete-audio/{filename}", post(audio::delete_audio))
        .route("/delete_file/{filename}", post(audio::delete_audio))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

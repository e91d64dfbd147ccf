use axum::extract::State;
use axum::response::Html;
use axum::Json;
use serde_json::{json, Value};

use super::{page, ApiError};
use crate::state::AppState;

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let files = state.gateway.list_files().await;
    let html = page::render_index(&state.templates, &files, state.gateway.settings())?;
    Ok(Html(html))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

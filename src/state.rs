//! Shared application state

use crate::api::page;
use crate::gateway::Gateway;
use crate::Result;
use minijinja::Environment;
use std::sync::Arc;

/// Default multipart body limit (20 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
    pub templates: Arc<Environment<'static>>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(gateway: Gateway) -> Result<Self> {
        Ok(Self {
            gateway: Arc::new(gateway),
            templates: Arc::new(page::environment()?),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        })
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}

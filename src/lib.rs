//! Media gateway - a small web backend for spoken media
//!
//! Turns submitted text into MP3 speech, describes uploaded images with a
//! vision model and speaks the description, and keeps every artifact in one
//! S3-compatible bucket that the index page lists for playback, download and
//! deletion.

pub mod ai;
pub mod api;
pub mod error;
pub mod gateway;
pub mod keys;
pub mod models;
pub mod prompts;
pub mod state;
pub mod storage;

pub use error::{Error, GatewayError, Result};

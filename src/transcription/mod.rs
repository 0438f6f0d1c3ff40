//! # Transcription Module
//!
//! The speech-to-text side of the voice demo. Nothing is decoded or
//! recognized in-process: audio is forwarded as-is to an OpenAI-compatible
//! transcription API and the recognized text is relayed back.
//!
//! ## Key Components:
//! - **Transcriber**: the trait both sides of the relay speak. The server
//!   implements it against the external API (`WhisperClient`); the recording
//!   controller implements it against our own `/api/transcribe` endpoint
//!   (`RelayClient` in the recording module). Tests substitute fakes.
//! - **extension_for_media_type**: fixed media-type → file-extension lookup
//!   used to name the uploaded payload.

pub mod client;

pub use client::WhisperClient;

use async_trait::async_trait;
use std::fmt;

/// Failure of a transcription call. `details` carries whatever the
/// downstream service reported, when anything.
#[derive(Debug, Clone)]
pub struct TranscribeError {
    pub message: String,
    pub details: Option<String>,
}

impl TranscribeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: Some(details.into()),
        }
    }
}

impl fmt::Display for TranscribeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{}: {}", self.message, details),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for TranscribeError {}

/// Converts one binary audio payload into recognized text.
///
/// One call per recording session, no retry, no partial results.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe a single audio payload. `media_type` is a hint such as
    /// `audio/webm`; the payload itself is forwarded unmodified.
    async fn transcribe(&self, audio: Vec<u8>, media_type: &str) -> Result<String, TranscribeError>;
}

/// Infer a file extension from a media-type hint.
///
/// Anything unrecognized falls back to `webm`, the format browsers record
/// in by default.
pub fn extension_for_media_type(media_type: &str) -> &'static str {
    if media_type.contains("webm") {
        "webm"
    } else if media_type.contains("ogg") {
        "ogg"
    } else if media_type.contains("mp4") {
        "mp4"
    } else if media_type.contains("mpeg") {
        "mp3"
    } else {
        "webm"
    }
}

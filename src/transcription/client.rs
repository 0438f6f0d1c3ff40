//! Production transcription backend: an OpenAI-compatible
//! `/audio/transcriptions` endpoint (OpenAI Whisper or equivalent).
//!
//! The payload is wrapped as a named multipart file (`audio.<ext>`, with the
//! extension inferred from the media-type hint) alongside the fixed model
//! identifier from configuration.

use super::{extension_for_media_type, TranscribeError, Transcriber};
use crate::config::TranscriptionConfig;
use async_trait::async_trait;
use tracing::debug;

/// Client for the external speech-to-text API.
#[derive(Debug, Clone)]
pub struct WhisperClient {
    /// Base URL without trailing slash (e.g. https://api.openai.com/v1)
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl WhisperClient {
    pub fn new(config: &TranscriptionConfig) -> Self {
        Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Transcriber for WhisperClient {
    async fn transcribe(&self, audio: Vec<u8>, media_type: &str) -> Result<String, TranscribeError> {
        let ext = extension_for_media_type(media_type);
        let url = format!("{}/audio/transcriptions", self.base_url);

        debug!(
            bytes = audio.len(),
            media_type = %media_type,
            ext = %ext,
            "Forwarding audio to transcription API"
        );

        let part = reqwest::multipart::Part::bytes(audio)
            .file_name(format!("audio.{}", ext))
            .mime_str(media_type)
            .map_err(|e| TranscribeError::with_details("Failed to transcribe audio", e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.model.clone());

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscribeError::with_details("Failed to transcribe audio", e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(TranscribeError::with_details(
                "Failed to transcribe audio",
                format!("transcription API error {}: {}", status, body),
            ));
        }

        let json: serde_json::Value = res
            .json()
            .await
            .map_err(|e| TranscribeError::with_details("Failed to transcribe audio", e.to_string()))?;
        let text = json
            .get("text")
            .and_then(|t| t.as_str())
            .unwrap_or("")
            .to_string();
        Ok(text)
    }
}

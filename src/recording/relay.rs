//! Client-side relay: submits a recorded payload to the backend's
//! `/api/transcribe` endpoint as a multipart `audio` field.

use crate::transcription::{extension_for_media_type, TranscribeError, Transcriber};
use async_trait::async_trait;

/// HTTP client for the transcription relay endpoint.
#[derive(Debug, Clone)]
pub struct RelayClient {
    endpoint: String,
    client: reqwest::Client,
}

impl RelayClient {
    /// `base_url` is the backend origin, e.g. `http://127.0.0.1:8080`.
    pub fn new(base_url: &str) -> Self {
        Self {
            endpoint: format!("{}/api/transcribe", base_url.trim_end_matches('/')),
            client: reqwest::Client::new(),
        }
    }

    /// Full URL this client posts recordings to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transcriber for RelayClient {
    async fn transcribe(&self, audio: Vec<u8>, media_type: &str) -> Result<String, TranscribeError> {
        let ext = extension_for_media_type(media_type);
        let part = reqwest::multipart::Part::bytes(audio)
            .file_name(format!("audio.{}", ext))
            .mime_str(media_type)
            .map_err(|e| TranscribeError::new(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("audio", part);

        let res = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscribeError::with_details("Failed to transcribe", e.to_string()))?;

        let status = res.status();
        let body: serde_json::Value = res
            .json()
            .await
            .map_err(|e| TranscribeError::with_details("Failed to transcribe", e.to_string()))?;

        match body.get("text").and_then(|t| t.as_str()) {
            Some(text) if status.is_success() => Ok(text.to_string()),
            _ => {
                let message = body
                    .get("error")
                    .and_then(|e| e.as_str())
                    .unwrap_or("Transcription failed")
                    .to_string();
                let details = body
                    .get("details")
                    .and_then(|d| d.as_str())
                    .map(|d| d.to_string());
                Err(TranscribeError { message, details })
            }
        }
    }
}

//! Transcription relay handler.
//!
//! Accepts a browser recording as a multipart `audio` field and forwards it
//! unmodified to the configured speech-to-text backend. No retry, no
//! caching, no partial results: the one downstream call either yields the
//! transcript or the failure is surfaced to the caller.

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use actix_multipart::{Field, Multipart};
use actix_web::{web, HttpResponse};
use futures_util::stream::StreamExt;
use serde_json::json;

/// Fallback when the browser omits the part's media type.
const DEFAULT_MEDIA_TYPE: &str = "audio/webm";

/// Transcribe an uploaded audio recording.
///
/// ## Endpoint: `POST /api/transcribe`
///
/// ## Request:
/// Multipart form data with a binary field named `audio`.
///
/// ## Response:
/// ```json
/// { "text": "Pick up groceries at five." }
/// ```
/// `400 {"error": "No audio file provided"}` when the field is missing;
/// `500 {"error": ..., "details": ...}` when the downstream service fails.
pub async fn transcribe(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    let mut audio_data: Option<Vec<u8>> = None;
    let mut media_type: Option<String> = None;

    while let Some(item) = payload.next().await {
        let mut field: Field =
            item.map_err(|e| AppError::BadRequest(format!("Multipart error: {}", e)))?;

        let content_disposition = field
            .content_disposition()
            .ok_or_else(|| AppError::BadRequest("Missing content disposition".to_string()))?;

        let field_name = content_disposition
            .get_name()
            .ok_or_else(|| AppError::BadRequest("Missing field name".to_string()))?;

        if field_name == "audio" {
            media_type = field.content_type().map(|m| m.to_string());

            let mut bytes = Vec::new();
            while let Some(chunk) = field.next().await {
                let chunk =
                    chunk.map_err(|e| AppError::BadRequest(format!("Chunk error: {}", e)))?;
                bytes.extend_from_slice(&chunk);
            }

            audio_data = Some(bytes);
        }
    }

    // A missing or empty field is rejected the same way; the client submits
    // even zero-fragment recordings, so this is a reachable path
    let audio_bytes = match audio_data {
        Some(bytes) if !bytes.is_empty() => bytes,
        _ => return Err(AppError::BadRequest("No audio file provided".to_string())),
    };
    let media_type = media_type.unwrap_or_else(|| DEFAULT_MEDIA_TYPE.to_string());

    let text = state
        .transcriber
        .transcribe(audio_bytes, &media_type)
        .await
        .map_err(|e| AppError::Upstream {
            message: e.message,
            details: e.details,
        })?;

    Ok(HttpResponse::Ok().json(json!({ "text": text })))
}

//! # Error Handling
//!
//! Custom error types for the two relay endpoints and how they are converted
//! into HTTP responses.
//!
//! ## Error Categories:
//! - **ValidationError**: user-correctable input problems (400)
//! - **BadRequest**: malformed relay requests, e.g. a missing file field (400)
//! - **Upstream**: a downstream dependency (transcription API, data store)
//!   failed; the dependency's detail is surfaced to the caller (500)
//! - **ConfigError**: configuration problems at startup (500)
//! - **Internal**: everything else server-side (500)
//!
//! All failures produce a structured JSON body with an `error` field and an
//! optional `details` field; none of them crash the process.

use actix_web::{error::JsonPayloadError, HttpRequest, HttpResponse, ResponseError};
use serde_json::json;
use std::fmt;
use tracing::error;

/// Application error type shared by all handlers.
#[derive(Debug)]
pub enum AppError {
    /// Client sent a malformed relay request (e.g. no audio file)
    BadRequest(String),

    /// User input failed validation rules
    ValidationError(String),

    /// A downstream dependency failed; `details` carries whatever the
    /// dependency reported and is included in the response when present
    Upstream {
        message: String,
        details: Option<String>,
    },

    /// Configuration file or environment variable problems
    ConfigError(String),

    /// Internal server errors
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::Upstream { message, details } => match details {
                Some(details) => write!(f, "Upstream error: {} ({})", message, details),
                None => write!(f, "Upstream error: {}", message),
            },
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

/// Converts errors into the flat JSON bodies the frontend expects:
/// `{"error": "...", "details": "..."?}` with a 400 or 500 status.
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status = match self {
            AppError::BadRequest(_) | AppError::ValidationError(_) => {
                actix_web::http::StatusCode::BAD_REQUEST
            }
            AppError::Upstream { .. } | AppError::ConfigError(_) | AppError::Internal(_) => {
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Downstream failures are logged server-side; the caller gets the detail too
        if let AppError::Upstream { message, details } = self {
            error!(message = %message, details = ?details, "Upstream dependency failure");
        }

        let body = match self {
            AppError::Upstream {
                message,
                details: Some(details),
            } => json!({ "error": message, "details": details }),
            AppError::Upstream { message, .. } => json!({ "error": message }),
            AppError::BadRequest(msg)
            | AppError::ValidationError(msg)
            | AppError::ConfigError(msg)
            | AppError::Internal(msg) => json!({ "error": msg }),
        };

        HttpResponse::build(status).json(body)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(format!("JSON parsing error: {}", err))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

/// Maps JSON extractor failures onto the structured error body, so a
/// malformed request body responds with `{"error": ...}` like every other
/// failure. Registered via `web::JsonConfig` at app construction.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid JSON body: {}", err)).into()
}

/// Shorthand for `Result<T, AppError>`.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_validation_error_is_400() {
        let err = AppError::ValidationError("Invalid email".to_string());
        assert_eq!(err.error_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_error_is_500() {
        let err = AppError::Upstream {
            message: "Failed to transcribe audio".to_string(),
            details: Some("quota exceeded".to_string()),
        };
        assert_eq!(
            err.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_json_extractor_failure_is_400() {
        let req = actix_web::test::TestRequest::default().to_http_request();
        let err = json_error_handler(JsonPayloadError::ContentType, &req);
        assert_eq!(err.error_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_display_includes_detail() {
        let err = AppError::Upstream {
            message: "Failed to transcribe audio".to_string(),
            details: Some("timeout".to_string()),
        };
        let text = err.to_string();
        assert!(text.contains("Failed to transcribe audio"));
        assert!(text.contains("timeout"));
    }
}

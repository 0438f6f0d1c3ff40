//! Waitlist relay handlers.

use crate::error::AppResult;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

/// Request body for a signup.
#[derive(Debug, Deserialize)]
pub struct WaitlistRequest {
    /// Missing email falls through to validation, which rejects it
    #[serde(default)]
    pub email: String,
    /// Optional origin tag; the configured default is used when absent
    pub source: Option<String>,
}

/// Join the waitlist.
///
/// ## Endpoint: `POST /api/waitlist`
///
/// ## Request:
/// ```json
/// { "email": "a@b.com" }
/// ```
///
/// ## Response:
/// ```json
/// { "message": "Success", "count": 42 }
/// ```
/// `message` is `"Already registered"` when the normalized email already
/// has an entry; `count` is the total after the call either way.
pub async fn join_waitlist(
    state: web::Data<AppState>,
    body: web::Json<WaitlistRequest>,
) -> AppResult<HttpResponse> {
    let outcome = state
        .waitlist
        .submit(&body.email, body.source.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": outcome.status.message(),
        "count": outcome.count
    })))
}

/// Current waitlist size, for display on the landing page.
///
/// ## Endpoint: `GET /api/waitlist`
///
/// Always responds `200 {"count": n}`; a store failure silently yields 0,
/// since this is a best-effort display value.
pub async fn waitlist_count(state: web::Data<AppState>) -> HttpResponse {
    let count = state.waitlist.count().await;
    HttpResponse::Ok().json(json!({ "count": count }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::transcription::{TranscribeError, Transcriber};
    use crate::waitlist::tests::MemoryStore;
    use crate::waitlist::WaitlistService;
    use actix_web::{test, App};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct NullTranscriber;

    #[async_trait]
    impl Transcriber for NullTranscriber {
        async fn transcribe(&self, _: Vec<u8>, _: &str) -> Result<String, TranscribeError> {
            Ok(String::new())
        }
    }

    fn test_state(store: Arc<MemoryStore>) -> AppState {
        AppState::new(
            AppConfig::default(),
            Arc::new(NullTranscriber),
            WaitlistService::new(store, "landing-page"),
        )
    }

    macro_rules! test_app {
        ($store:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(test_state($store)))
                    .app_data(
                        web::JsonConfig::default()
                            .error_handler(crate::error::json_error_handler),
                    )
                    .route("/api/waitlist", web::post().to(join_waitlist))
                    .route("/api/waitlist", web::get().to(waitlist_count)),
            )
            .await
        };
    }

    fn post(email: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/waitlist")
            .set_json(json!({ "email": email }))
    }

    #[actix_web::test]
    async fn test_signup_then_duplicate() {
        let store = Arc::new(MemoryStore::default());
        let app = test_app!(store);

        let res = test::call_service(&app, post("a@b.com").to_request()).await;
        assert!(res.status().is_success());
        let json: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(json["message"], "Success");
        assert_eq!(json["count"], 1);

        // Same email, different case: no new entry, count unchanged
        let res = test::call_service(&app, post("A@B.COM").to_request()).await;
        assert!(res.status().is_success());
        let json: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(json["message"], "Already registered");
        assert_eq!(json["count"], 1);
    }

    #[actix_web::test]
    async fn test_invalid_email_is_400() {
        let store = Arc::new(MemoryStore::default());
        let app = test_app!(store.clone());

        let res = test::call_service(&app, post("not-an-email").to_request()).await;
        assert_eq!(res.status().as_u16(), 400);
        let json: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(json["error"], "Invalid email");
        assert!(store.entries.lock().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_missing_email_is_400() {
        let store = Arc::new(MemoryStore::default());
        let app = test_app!(store);

        let req = test::TestRequest::post()
            .uri("/api/waitlist")
            .set_json(json!({}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status().as_u16(), 400);
    }

    #[actix_web::test]
    async fn test_malformed_json_gets_structured_error_body() {
        let store = Arc::new(MemoryStore::default());
        let app = test_app!(store.clone());

        let req = test::TestRequest::post()
            .uri("/api/waitlist")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status().as_u16(), 400);
        let json: serde_json::Value = test::read_body_json(res).await;
        assert!(json["error"].as_str().is_some());
        assert!(store.entries.lock().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_count_on_empty_store() {
        let store = Arc::new(MemoryStore::default());
        let app = test_app!(store);

        let req = test::TestRequest::get().uri("/api/waitlist").to_request();
        let res = test::call_service(&app, req).await;
        assert!(res.status().is_success());
        let json: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(json["count"], 0);
    }

    #[actix_web::test]
    async fn test_count_defaults_to_zero_on_store_failure() {
        let store = Arc::new(MemoryStore {
            fail: true,
            ..Default::default()
        });
        let app = test_app!(store);

        let req = test::TestRequest::get().uri("/api/waitlist").to_request();
        let res = test::call_service(&app, req).await;
        // Fetch failure is non-fatal for the display value
        assert!(res.status().is_success());
        let json: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(json["count"], 0);
    }
}

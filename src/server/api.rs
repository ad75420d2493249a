//! Axum handlers for `/api/*` routes.
//!
//! Every failure is answered with `{ "error": "<message>" }` and a non-2xx
//! status so the UI can show the message inline.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, warn};

use crate::codegen::{self, detect_language};
use crate::core::config::API_KEY_VARS;
use crate::llm::ProviderError;

use super::AppState;

const PROMPT_REQUIRED: &str = "Prompt is required";
const PAYMENT_REQUIRED: &str = "Payment required. Please check your inference API account balance.";

// ── Request types ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct PromptRequest {
    #[serde(default)]
    prompt: Option<String>,
}

impl PromptRequest {
    fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn json_error(status: StatusCode, msg: impl std::fmt::Display) -> Response {
    (status, Json(json!({ "error": msg.to_string() }))).into_response()
}

fn missing_key_message() -> String {
    format!(
        "API key is not configured. Please set the {} environment variable.",
        API_KEY_VARS[0]
    )
}

/// Map an upstream failure onto the HTTP answer the UI gets.
fn provider_error_response(err: &ProviderError) -> Response {
    match err {
        ProviderError::Upstream { status: 402, .. } => {
            json_error(StatusCode::PAYMENT_REQUIRED, PAYMENT_REQUIRED)
        }
        ProviderError::Upstream { status, message } => {
            let status = StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY);
            json_error(status, message)
        }
        ProviderError::MissingApiKey => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, missing_key_message())
        }
        other => json_error(StatusCode::INTERNAL_SERVER_ERROR, other),
    }
}

fn parse_body(payload: Result<Json<PromptRequest>, JsonRejection>) -> Result<String, Response> {
    let Json(req) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "rejected request body");
        json_error(StatusCode::BAD_REQUEST, rejection.body_text())
    })?;
    req.prompt()
        .map(ToString::to_string)
        .ok_or_else(|| json_error(StatusCode::BAD_REQUEST, PROMPT_REQUIRED))
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// GET /api/health
pub(super) async fn health(State(state): State<AppState>) -> Response {
    let provider = state.provider.as_deref().map_or("unconfigured", |p| p.name());
    (StatusCode::OK, Json(json!({ "status": "ok", "provider": provider }))).into_response()
}

/// POST /api/detect
pub(super) async fn detect(payload: Result<Json<PromptRequest>, JsonRejection>) -> Response {
    match parse_body(payload) {
        Ok(prompt) => {
            let language = detect_language(&prompt);
            (StatusCode::OK, Json(json!({ "language": language }))).into_response()
        }
        Err(response) => response,
    }
}

/// POST /api/generate
pub(super) async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<PromptRequest>, JsonRejection>,
) -> Response {
    let Some(provider) = state.provider.clone() else {
        error!("generate called but no API key is configured");
        return json_error(StatusCode::INTERNAL_SERVER_ERROR, missing_key_message());
    };

    let prompt = match parse_body(payload) {
        Ok(prompt) => prompt,
        Err(response) => return response,
    };

    match tokio::time::timeout(state.request_timeout, codegen::generate(&provider, &prompt)).await {
        Ok(Ok(generated)) => (StatusCode::OK, Json(generated)).into_response(),
        Ok(Err(e)) => {
            warn!(provider = provider.name(), error = %e, "generation failed");
            provider_error_response(&e)
        }
        Err(_) => {
            warn!(
                provider = provider.name(),
                timeout_secs = state.request_timeout.as_secs(),
                "generation timed out"
            );
            json_error(StatusCode::GATEWAY_TIMEOUT, "Code generation timed out")
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use tower::ServiceExt;

    use super::*;
    use crate::llm::LlmProvider;
    use crate::llm::providers::dummy::DummyProvider;
    use crate::server::router;

    fn dummy_state() -> AppState {
        AppState::new(Some(LlmProvider::Dummy(DummyProvider)), Duration::from_secs(5))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn generate_without_key_is_500() {
        let app = router(AppState::new(None, Duration::from_secs(5)));
        let response = app
            .oneshot(post_json("/api/generate", r#"{"prompt":"sort a list"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("LLM_API_KEY"));
    }

    #[tokio::test]
    async fn generate_without_prompt_is_400() {
        for body in [r#"{}"#, r#"{"prompt":""}"#, r#"{"prompt":"   "}"#, r#"{"prompt":null}"#] {
            let response = router(dummy_state())
                .oneshot(post_json("/api/generate", body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
            assert_eq!(body_json(response).await["error"], "Prompt is required");
        }
    }

    #[tokio::test]
    async fn generate_with_invalid_json_is_400() {
        let response = router(dummy_state())
            .oneshot(post_json("/api/generate", "{not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn generate_returns_code_and_language() {
        let response = router(dummy_state())
            .oneshot(post_json("/api/generate", r#"{"prompt":"implement a stack in java"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["language"], "java");
        let code = body["code"].as_str().unwrap();
        assert!(code.contains("implement a stack in java"));
        assert!(!code.contains("```"));
    }

    #[tokio::test]
    async fn detect_returns_language() {
        let response = router(dummy_state())
            .oneshot(post_json("/api/detect", r#"{"prompt":"Write a Golang HTTP handler"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["language"], "go");
    }

    #[tokio::test]
    async fn health_reports_provider() {
        let request = Request::builder().uri("/api/health").body(Body::empty()).unwrap();
        let response = router(dummy_state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["provider"], "dummy");

        let request = Request::builder().uri("/api/health").body(Body::empty()).unwrap();
        let response = router(AppState::new(None, Duration::from_secs(1)))
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(body_json(response).await["provider"], "unconfigured");
    }

    #[test]
    fn payment_required_has_fixed_message() {
        let response = provider_error_response(&ProviderError::Upstream {
            status: 402,
            message: "insufficient credit".into(),
        });
        assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    }

    #[test]
    fn upstream_status_is_proxied() {
        let response = provider_error_response(&ProviderError::Upstream {
            status: 422,
            message: "invalid version".into(),
        });
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        // A success code from upstream cannot be proxied as an error.
        let response = provider_error_response(&ProviderError::Upstream {
            status: 200,
            message: "odd".into(),
        });
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn poll_failures_are_500() {
        for err in [
            ProviderError::TimedOut { attempts: 60 },
            ProviderError::Canceled,
            ProviderError::PredictionFailed("boom".into()),
            ProviderError::EmptyOutput,
        ] {
            let response = provider_error_response(&err);
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{err:?}");
        }
    }
}

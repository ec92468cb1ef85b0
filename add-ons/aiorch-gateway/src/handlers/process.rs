//! `POST /process`: validates the request, runs the orchestrator and maps the outcome to a
//! status code. Pipeline failures captured in the envelope still answer 200; malformed
//! bodies and validation errors answer 400; panics are turned into 500 by the router.

use crate::AppState;
use aiorch_core::{AiMode, Intent, ResultEnvelope};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use std::time::Instant;
use tracing::Instrument;

#[derive(Debug, serde::Deserialize)]
pub(crate) struct ProcessRequest {
    #[serde(default, alias = "Prompt")]
    prompt: Option<String>,
    /// `"Ollama"` / `"Agent"` or `0` / `1`.
    #[serde(default, alias = "Mode")]
    mode: Option<serde_json::Value>,
}

pub(crate) async fn process(
    State(state): State<AppState>,
    body: Result<Json<ProcessRequest>, JsonRejection>,
) -> (StatusCode, Json<ResultEnvelope>) {
    let request_id = short_request_id();
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::warn!(
                target: "aiorch::gateway",
                %request_id,
                error = %rejection.body_text(),
                "Rejected request body"
            );
            return bad_request(rejection.body_text());
        }
    };
    let prompt = req.prompt.unwrap_or_default();
    let span = tracing::info_span!(
        "process",
        request_id = %request_id,
        mode = tracing::field::Empty,
        prompt_len = prompt.chars().count()
    );

    async move {
        let mode = match AiMode::from_wire(req.mode.as_ref()) {
            Ok(mode) => mode,
            Err(e) => {
                tracing::warn!(target: "aiorch::gateway", error = %e, "Rejected request");
                return bad_request(e.to_string());
            }
        };
        tracing::Span::current().record("mode", tracing::field::display(mode));
        tracing::info!(target: "aiorch::gateway", %mode, prompt = %prompt, "AI request started");

        let started = Instant::now();
        match state.orchestrator.try_handle(&prompt, mode).await {
            Ok(envelope) => {
                tracing::info!(
                    target: "aiorch::gateway",
                    success = envelope.success(),
                    api_called = envelope.api_called(),
                    duration_ms = started.elapsed().as_millis() as u64,
                    "AI request finished"
                );
                if let Some(error) = envelope.error_message() {
                    tracing::warn!(target: "aiorch::gateway", %error, "AI processing failed");
                }
                (StatusCode::OK, Json(envelope))
            }
            // Composer failures come back inside the envelope; only validation errors reach here.
            Err(e) => {
                tracing::warn!(target: "aiorch::gateway", error = %e, "Rejected request");
                bad_request(e.to_string())
            }
        }
    }
    .instrument(span)
    .await
}

fn bad_request(message: String) -> (StatusCode, Json<ResultEnvelope>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ResultEnvelope::failure(Intent::None.api_name(), message)),
    )
}

/// First 8 hex chars of a v4 UUID.
fn short_request_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

//! Route handler functions for the relay endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use facechat_core::types::{ChatEnvelope, ChatRequest};

use crate::error::ApiError;
use crate::state::AppState;

/// Reply text sent in place of any upstream failure.
pub const FAILURE_SENTINEL: &str = "Failed to get a response from the inference backend.";

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub upstream: String,
}

/// POST /chat - forward one message to the inference backend.
///
/// Always answers with a `{ response }` envelope: 200 with the upstream
/// reply, or 500 with [`FAILURE_SENTINEL`]. The message is forwarded as-is,
/// empty or not.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ChatEnvelope>), ApiError> {
    let Json(request) = payload?;

    match state.upstream.forward(&request.message).await {
        Ok(reply) => Ok((StatusCode::OK, Json(ChatEnvelope::new(reply)))),
        Err(e) => {
            tracing::error!(
                kind = e.kind(),
                reached_upstream = e.reached_upstream(),
                upstream = state.upstream.endpoint(),
                error = %e,
                "Error talking to inference backend"
            );
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ChatEnvelope::new(FAILURE_SENTINEL)),
            ))
        }
    }
}

/// GET /health - liveness for operators. Does not touch the upstream.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        upstream: state.upstream.endpoint().to_string(),
    })
}

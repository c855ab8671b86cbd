//! Router setup with the relay routes and middleware.
//!
//! Configures the axum Router with CORS, tracing, a body size limit,
//! and the endpoint handlers.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use facechat_core::config::RelayConfig;
use facechat_core::error::{FacechatError, Result};

use crate::handlers;
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins(&state.config))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/chat", post(handlers::chat))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Configured CORS origins; an empty list allows any origin.
fn allowed_origins(config: &RelayConfig) -> AllowOrigin {
    if config.cors_origins.is_empty() {
        return AllowOrigin::any();
    }
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    AllowOrigin::list(origins)
}

/// Start the relay on the configured address.
pub async fn start_server(state: AppState) -> Result<()> {
    let addr = state.config.bind_addr();
    let router = create_router(state);

    tracing::info!("Starting chat relay on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| FacechatError::Relay(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| FacechatError::Relay(format!("Server error: {}", e)))?;

    Ok(())
}

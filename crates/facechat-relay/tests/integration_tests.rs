//! Integration tests for the chat relay.
//!
//! Each test runs the router in-process against its own wiremock server
//! standing in for the inference backend.

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use facechat_core::config::RelayConfig;
use facechat_relay::handlers::HealthResponse;
use facechat_relay::{create_router, AppState, InferenceClient, FAILURE_SENTINEL};

// =============================================================================
// Helpers
// =============================================================================

fn make_app_with_config(config: RelayConfig, timeout: Duration) -> axum::Router {
    let upstream = InferenceClient::new(&config.upstream_url, timeout).unwrap();
    create_router(AppState::with_upstream(config, upstream))
}

fn make_app_with(upstream_url: &str, timeout: Duration) -> axum::Router {
    let config = RelayConfig {
        upstream_url: upstream_url.to_string(),
        ..RelayConfig::default()
    };
    make_app_with_config(config, timeout)
}

fn make_app(upstream: &MockServer) -> axum::Router {
    make_app_with(&upstream.uri(), Duration::from_secs(5))
}

fn make_app_with_origins(upstream: &MockServer, origins: &[&str]) -> axum::Router {
    let config = RelayConfig {
        upstream_url: upstream.uri(),
        cors_origins: origins.iter().map(|o| o.to_string()).collect(),
        ..RelayConfig::default()
    };
    make_app_with_config(config, Duration::from_secs(5))
}

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method("OPTIONS")
        .uri("/chat")
        .header("origin", origin)
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, json: &str) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

async fn body_json_value(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// POST /chat
// =============================================================================

#[tokio::test]
async fn test_chat_forwards_reply_verbatim() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({ "message": "hello" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "hi" })))
        .expect(1)
        .mount(&upstream)
        .await;

    let resp = make_app(&upstream)
        .oneshot(post_json("/chat", r#"{"message":"hello"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json_value(resp).await, json!({ "response": "hi" }));
}

#[tokio::test]
async fn test_chat_passes_empty_message_through() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({ "message": "" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "response": "Empty message." })),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let resp = make_app(&upstream)
        .oneshot(post_json("/chat", r#"{"message":""}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json_value(resp).await["response"], "Empty message.");
}

#[tokio::test]
async fn test_chat_upstream_error_status_yields_sentinel() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .expect(1)
        .mount(&upstream)
        .await;

    let resp = make_app(&upstream)
        .oneshot(post_json("/chat", r#"{"message":"hello"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json_value(resp).await,
        json!({ "response": FAILURE_SENTINEL })
    );
}

#[tokio::test]
async fn test_chat_upstream_timeout_yields_sentinel() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "response": "too late" }))
                .set_delay(Duration::from_millis(500)),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let resp = make_app_with(&upstream.uri(), Duration::from_millis(50))
        .oneshot(post_json("/chat", r#"{"message":"hello"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json_value(resp).await["response"], FAILURE_SENTINEL);
}

#[tokio::test]
async fn test_chat_malformed_upstream_payload_yields_sentinel() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "reply": "wrong key" })))
        .mount(&upstream)
        .await;

    let resp = make_app(&upstream)
        .oneshot(post_json("/chat", r#"{"message":"hello"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json_value(resp).await["response"], FAILURE_SENTINEL);
}

#[tokio::test]
async fn test_chat_unreachable_upstream_yields_sentinel() {
    let resp = make_app_with("http://127.0.0.1:1", Duration::from_secs(2))
        .oneshot(post_json("/chat", r#"{"message":"hello"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json_value(resp).await;
    assert_eq!(json["response"], FAILURE_SENTINEL);
    // Technical detail stays in the logs.
    assert!(!json["response"].as_str().unwrap().contains("127.0.0.1"));
}

#[tokio::test]
async fn test_chat_invalid_json_is_rejected_before_forwarding() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "x" })))
        .expect(0)
        .mount(&upstream)
        .await;

    let app = make_app(&upstream);
    let resp = app
        .clone()
        .oneshot(post_json("/chat", "{not json"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json_value(resp).await["error"], "bad_request");

    let resp = app
        .oneshot(post_json("/chat", r#"{"text":"hello"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json_value(resp).await["error"], "unprocessable_entity");
}

#[tokio::test]
async fn test_chat_missing_content_type() {
    let upstream = MockServer::start().await;
    let resp = make_app(&upstream)
        .oneshot(
            Request::post("/chat")
                .body(Body::from(r#"{"message":"hello"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_chat_get_not_allowed() {
    let upstream = MockServer::start().await;
    let resp = make_app(&upstream)
        .oneshot(Request::get("/chat").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_each_request_forwards_exactly_once() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&upstream)
        .await;

    let app = make_app(&upstream);
    for _ in 0..3 {
        let resp = app
            .clone()
            .oneshot(post_json("/chat", r#"{"message":"retry me"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

// =============================================================================
// Other routes and middleware
// =============================================================================

#[tokio::test]
async fn test_health() {
    let upstream = MockServer::start().await;
    let resp = make_app(&upstream)
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let health: HealthResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.upstream, format!("{}/chat", upstream.uri()));
}

#[tokio::test]
async fn test_unknown_route_404() {
    let upstream = MockServer::start().await;
    let resp = make_app(&upstream)
        .oneshot(Request::get("/register").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_default_allows_any_origin() {
    let upstream = MockServer::start().await;
    let resp = make_app(&upstream)
        .oneshot(preflight("http://anywhere.example"))
        .await
        .unwrap();

    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .map(|v| v.to_str().unwrap()),
        Some("*")
    );
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let upstream = MockServer::start().await;
    let resp = make_app_with_origins(&upstream, &["http://localhost:3000"])
        .oneshot(preflight("http://localhost:3000"))
        .await
        .unwrap();

    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .map(|v| v.to_str().unwrap()),
        Some("http://localhost:3000")
    );
}

#[tokio::test]
async fn test_cors_rejects_unlisted_origin() {
    let upstream = MockServer::start().await;
    let resp = make_app_with_origins(&upstream, &["http://localhost:3000"])
        .oneshot(preflight("http://evil.example"))
        .await
        .unwrap();

    assert!(resp.headers().get("access-control-allow-origin").is_none());
}

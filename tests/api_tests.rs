use ura_chat::message::{ChatResponse, ErrorResponse};
use ura_chat::routes::create_router;
use ura_chat::services::completion::{CompletionClient, CompletionError};
use ura_chat::state::AppState;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use tower::util::ServiceExt;

enum Upstream {
    Echo,
    Rejects,
    Unreachable,
}

#[async_trait]
impl CompletionClient for Upstream {
    async fn complete(&self, message: &str) -> Result<String, CompletionError> {
        match self {
            Upstream::Echo => Ok(format!("You said: {message}")),
            Upstream::Rejects => Err(CompletionError::Upstream {
                status: 429,
                details: serde_json::json!({ "error": { "message": "Rate limit reached" } }),
            }),
            Upstream::Unreachable => Err(CompletionError::Transport("connection refused".into())),
        }
    }
}

fn app(upstream: Upstream) -> Router {
    let state = Arc::new(AppState::new(Arc::new(upstream)));
    create_router(concat!(env!("CARGO_MANIFEST_DIR"), "/public")).with_state(state)
}

fn post(uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_chat_endpoint() {
    let response = app(Upstream::Echo)
        .oneshot(post("/chat", r#"{"message": "hello"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let reply: ChatResponse = body_json(response).await;
    assert_eq!(reply.reply, "You said: hello");
}

#[tokio::test]
async fn test_api_chat_alias() {
    let response = app(Upstream::Echo)
        .oneshot(post("/api/chat", r#"{"message": "  padded  "}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let reply: ChatResponse = body_json(response).await;
    assert_eq!(reply.reply, "You said:   padded  ");
}

#[tokio::test]
async fn test_whitespace_message_is_relayed() {
    let response = app(Upstream::Echo)
        .oneshot(post("/chat", r#"{"message": "   "}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let reply: ChatResponse = body_json(response).await;
    assert_eq!(reply.reply, "You said:    ");
}

#[tokio::test]
async fn test_missing_or_empty_message_is_rejected() {
    let app = app(Upstream::Echo);

    for body in [r#"{}"#, r#"{"message": ""}"#, r#"{"message": null}"#, "not json"] {
        let response = app.clone().oneshot(post("/chat", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        let err: ErrorResponse = body_json(response).await;
        assert_eq!(err.error, "message required");
    }
}

#[tokio::test]
async fn test_wrong_method_is_405() {
    let app = app(Upstream::Echo);

    for (method, uri) in [("GET", "/chat"), ("PUT", "/api/chat"), ("DELETE", "/chat")] {
        let response = app
            .clone()
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{method} {uri}");
        let err: ErrorResponse = body_json(response).await;
        assert_eq!(err.error, "Method not allowed");
    }
}

#[tokio::test]
async fn test_upstream_error_carries_details() {
    let response = app(Upstream::Rejects)
        .oneshot(post("/chat", r#"{"message": "hello"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let err: ErrorResponse = body_json(response).await;
    assert_eq!(err.error, "Model API error");
    assert_eq!(err.details.unwrap()["error"]["message"], "Rate limit reached");
}

#[tokio::test]
async fn test_transport_error_is_generic() {
    let response = app(Upstream::Unreachable)
        .oneshot(post("/chat", r#"{"message": "hello"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let err: ErrorResponse = body_json(response).await;
    assert_eq!(err.error, "Internal server error");
    assert!(err.details.is_none());
}

#[tokio::test]
async fn test_health_and_static_page() {
    let app = app(Upstream::Echo);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("/api/chat"));
}

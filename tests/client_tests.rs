use ura_chat::client::{ChatTransport, HttpTransport, TransportError};
use ura_chat::routes::create_router;
use ura_chat::services::completion::{CompletionClient, CompletionError};
use ura_chat::state::AppState;

use async_trait::async_trait;
use std::sync::Arc;

struct Shout;

#[async_trait]
impl CompletionClient for Shout {
    async fn complete(&self, message: &str) -> Result<String, CompletionError> {
        if message == "fail" {
            return Err(CompletionError::Transport("boom".into()));
        }
        Ok(message.to_uppercase())
    }
}

async fn spawn_relay() -> String {
    let state = Arc::new(AppState::new(Arc::new(Shout)));
    let app = create_router("public").with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}

#[tokio::test]
async fn test_http_transport_round_trip() {
    let base = spawn_relay().await;
    let transport = HttpTransport::new(&base);
    assert!(transport.endpoint().ends_with("/api/chat"));
    assert!(!transport.endpoint().contains("//api"));

    assert_eq!(transport.send_chat("hello").await.unwrap(), "HELLO");
}

#[tokio::test]
async fn test_http_transport_error_body_means_no_reply() {
    let base = spawn_relay().await;
    let transport = HttpTransport::new(&base);

    assert!(matches!(
        transport.send_chat("fail").await,
        Err(TransportError::NoReply)
    ));
    assert!(matches!(
        transport.send_chat("   ").await,
        Err(TransportError::NoReply)
    ));
}

use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("could not reach chat server: {0}")]
    Http(#[from] reqwest::Error),

    #[error("chat server answered without a reply")]
    NoReply,
}

/// One round trip to the relay: message in, reply text out.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_chat(&self, message: &str) -> Result<String, TransportError>;
}

/// Posts to the relay's `/api/chat` route.
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/api/chat", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send_chat(&self, message: &str) -> Result<String, TransportError> {
        // Error statuses still carry a JSON body; a missing `reply` is what matters.
        let data: serde_json::Value = self
            .http
            .post(&self.endpoint)
            .json(&json!({ "message": message }))
            .send()
            .await?
            .json()
            .await?;

        data.get("reply")
            .and_then(|r| r.as_str())
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .ok_or(TransportError::NoReply)
    }
}

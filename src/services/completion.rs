use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::config::CompletionSettings;

/// Substituted when the model answers without usable content.
pub const FALLBACK_REPLY: &str = "No response from model.";

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("request to model API failed: {0}")]
    Transport(String),

    #[error("model API returned status {status}")]
    Upstream {
        status: u16,
        details: serde_json::Value,
    },

    #[error("could not decode model API response: {0}")]
    Decode(String),
}

/// Sends one user message to a chat-completion backend and returns the reply text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, message: &str) -> Result<String, CompletionError>;
}

#[derive(Debug, Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<PromptMessage<'a>>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Serialize)]
pub struct PromptMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

/// OpenAI-compatible client for the Groq chat completions endpoint.
pub struct GroqClient {
    http: reqwest::Client,
    settings: CompletionSettings,
}

impl GroqClient {
    pub fn new(settings: CompletionSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }

    pub fn build_request<'a>(&'a self, message: &'a str) -> CompletionRequest<'a> {
        CompletionRequest {
            model: &self.settings.model,
            messages: vec![
                PromptMessage {
                    role: "system",
                    content: &self.settings.system_prompt,
                },
                PromptMessage {
                    role: "user",
                    content: message,
                },
            ],
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        }
    }
}

#[async_trait]
impl CompletionClient for GroqClient {
    async fn complete(&self, message: &str) -> Result<String, CompletionError> {
        let request = self.build_request(message);
        debug!(model = %self.settings.model, "sending completion request");

        let response = self
            .http
            .post(&self.settings.api_url)
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Model API unreachable: {}", e);
                CompletionError::Transport(e.to_string())
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read model API response: {}", e);
            CompletionError::Transport(e.to_string())
        })?;

        if !status.is_success() {
            error!("Model API error: Status: {}, Body: {}", status, body);
            let details = serde_json::from_str(&body)
                .unwrap_or_else(|_| serde_json::Value::String(body));
            return Err(CompletionError::Upstream {
                status: status.as_u16(),
                details,
            });
        }

        let data: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
            error!("Model API returned malformed JSON: {}", e);
            CompletionError::Decode(e.to_string())
        })?;

        Ok(extract_reply(&data))
    }
}

/// Pulls `choices[0].message.content`, trimmed; falls back to [`FALLBACK_REPLY`].
pub fn extract_reply(data: &serde_json::Value) -> String {
    data.pointer("/choices/0/message/content")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(FALLBACK_REPLY)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings() -> CompletionSettings {
        CompletionSettings {
            api_key: "gsk_test".to_string(),
            api_url: "http://localhost/v1/chat/completions".to_string(),
            model: "llama3-8b-8192".to_string(),
            system_prompt: "You are a helpful assistant named URA.".to_string(),
            max_tokens: 512,
            temperature: 0.7,
        }
    }

    #[test]
    fn request_shape() {
        let client = GroqClient::new(settings());
        let body = serde_json::to_value(client.build_request("hi there")).unwrap();
        assert_eq!(body["model"], "llama3-8b-8192");
        assert_eq!(body["max_tokens"], 512);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1], json!({ "role": "user", "content": "hi there" }));
        assert!(body["temperature"].as_f64().unwrap() > 0.69);
    }

    #[test]
    fn extracts_first_choice() {
        let data = json!({ "choices": [{ "message": { "content": "  Hello \n" } }] });
        assert_eq!(extract_reply(&data), "Hello");
    }

    #[test]
    fn falls_back_when_content_missing() {
        assert_eq!(extract_reply(&json!({})), FALLBACK_REPLY);
        assert_eq!(extract_reply(&json!({ "choices": [] })), FALLBACK_REPLY);
        assert_eq!(
            extract_reply(&json!({ "choices": [{ "message": { "content": "   " } }] })),
            FALLBACK_REPLY
        );
    }
}

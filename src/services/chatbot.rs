use tracing::info;

use super::completion::CompletionClient;
use crate::error::AppError;

/// Rejects an absent or empty message and relays anything else to the model
/// exactly as received.
pub async fn generate_reply(
    client: &dyn CompletionClient,
    message: Option<&str>,
) -> Result<String, AppError> {
    let text = match message {
        Some(text) if !text.is_empty() => text,
        _ => return Err(AppError::BadRequest("message required".to_string())),
    };

    info!(chars = text.chars().count(), "relaying message to model");
    let reply = client.complete(text).await?;
    Ok(reply)
}

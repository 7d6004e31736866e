use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::warn;

use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse},
    services::chatbot::generate_reply,
    state::SharedState,
};

pub async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        warn!("Rejected chat body: {}", rejection.body_text());
        AppError::BadRequest("message required".to_string())
    })?;

    let reply = generate_reply(state.completion.as_ref(), payload.message.as_deref()).await?;

    Ok(Json(ChatResponse { reply }))
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

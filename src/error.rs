// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::message::ErrorResponse;
use crate::services::completion::CompletionError;

/// Errors surfaced at the handler boundary. Every variant renders as a JSON body.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("{message}")]
    Upstream {
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("Internal server error")]
    Internal,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Upstream { .. } | AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CompletionError> for AppError {
    fn from(err: CompletionError) -> Self {
        match err {
            CompletionError::Upstream { details, .. } => AppError::Upstream {
                message: "Model API error".to_string(),
                details: Some(details),
            },
            CompletionError::Decode(reason) => AppError::Upstream {
                message: "Model API error".to_string(),
                details: Some(serde_json::Value::String(reason)),
            },
            CompletionError::Transport(_) => AppError::Internal,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::Upstream { message, details } => ErrorResponse {
                error: message,
                details,
            },
            other => ErrorResponse {
                error: other.to_string(),
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_failures_stay_generic() {
        let err = AppError::from(CompletionError::Transport("dns error".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[test]
    fn upstream_failures_carry_details() {
        let err = AppError::from(CompletionError::Upstream {
            status: 401,
            details: serde_json::json!({ "error": { "message": "Invalid API Key" } }),
        });
        match err {
            AppError::Upstream { message, details } => {
                assert_eq!(message, "Model API error");
                assert!(details.unwrap()["error"]["message"].is_string());
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}

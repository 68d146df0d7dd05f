//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use atlas_core::chat::{ChatError, FieldIssue};

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error")]
    Validation(Vec<FieldIssue>),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Internal server error")]
    Internal(String),
}

/// JSON body returned for every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(issues) => {
                let details: serde_json::Map<String, serde_json::Value> = issues
                    .into_iter()
                    .map(|issue| (issue.path, serde_json::Value::String(issue.message)))
                    .collect();
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Invalid request payload.".to_string(),
                        details: Some(serde_json::Value::Object(details)),
                    },
                )
            }
            AppError::Configuration(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: message,
                    details: None,
                },
            ),
            AppError::Provider(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: "The agent encountered an error while processing your request."
                        .to_string(),
                    details: Some(serde_json::Value::String(message)),
                },
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: "Internal server error".to_string(),
                    details: None,
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

/// Maps errors from an inbound-request context: validation failures are the
/// client's fault. Turn-level errors are mapped in the chat handler instead,
/// where reply-side validation counts as a processing failure.
impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::Config(message) => AppError::Configuration(message),
            ChatError::Validation(issues) => AppError::Validation(issues),
            ChatError::Provider(message) => AppError::Provider(message),
        }
    }
}

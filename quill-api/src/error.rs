use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Route-level errors with their HTTP mapping.
///
/// Internal causes are logged server-side and flattened to a generic
/// message for clients, the same sanitize-before-responding posture the
/// rest of the stack takes.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthenticated(&'static str),
    NotFound(&'static str),
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::Internal(e)
    }
}

impl From<quill_queue::QueueError> for ApiError {
    fn from(e: quill_queue::QueueError) -> Self {
        Self::Internal(anyhow::Error::new(e))
    }
}

impl From<quill_store::StoreError> for ApiError {
    fn from(e: quill_store::StoreError) -> Self {
        if e.is_not_found() {
            Self::NotFound("Report not found")
        } else {
            Self::Internal(anyhow::Error::new(e))
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::Unauthenticated(message) => (StatusCode::UNAUTHORIZED, message.to_string()),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message.to_string()),
            Self::Internal(e) => {
                error!(error = %e, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tinylink_service::ServiceError;
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Gateway-level failure, rendered as a JSON error body.
#[derive(Debug)]
pub enum AppError {
    /// Missing, malformed, or unverifiable bearer token.
    Unauthorized,
    /// Unknown short code on a lookup the client addressed directly.
    NotFound,
    /// Gateway-side failure with no client-actionable detail.
    Internal(String),
    Service(ServiceError),
}

impl From<ServiceError> for AppError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

impl AppError {
    fn status_and_body(&self) -> (StatusCode, String, &'static str) {
        match self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Missing or invalid bearer token".to_owned(),
                "UNAUTHORIZED",
            ),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                "Short code not found".to_owned(),
                "NOT_FOUND",
            ),
            AppError::Internal(detail) => {
                error!(error = %detail, "request failed in gateway");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_owned(),
                    "INTERNAL",
                )
            }
            AppError::Service(err) => match err {
                ServiceError::InvalidUrl(_) => {
                    (StatusCode::BAD_REQUEST, err.to_string(), "INVALID_URL")
                }
                ServiceError::InvalidUserId(_) => {
                    (StatusCode::BAD_REQUEST, err.to_string(), "INVALID_USER_ID")
                }
                ServiceError::CollisionRetryExhausted => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    err.to_string(),
                    "COLLISION_RETRY_EXHAUSTED",
                ),
                ServiceError::Storage(_) => {
                    error!(error = %err, "request failed on storage");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal error".to_owned(),
                        "INTERNAL",
                    )
                }
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, code) = self.status_and_body();
        (status, Json(json!({ "error": message, "code": code }))).into_response()
    }
}

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::services::IdentityError;

/// Errors surfaced by the public endpoints.
///
/// Every variant renders as `{"error": ...}`; callers match on that field.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field is missing or malformed. Carries a machine-readable code.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    /// The identity provider returned an explicit error payload.
    #[error("upstream rejected the request")]
    UpstreamRejected(Value),

    #[error("{0}")]
    Internal(String),

    /// Analysis failed; the cause is logged, never returned.
    #[error("analysis failed")]
    Analysis,
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Rejected(payload) => ApiError::UpstreamRejected(payload),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::InvalidInput(code) => (StatusCode::BAD_REQUEST, json!(code)),
            ApiError::InvalidBody(rejection) => {
                // Oversized bodies keep their 413; every other decode failure is a 400.
                let status = match rejection.status() {
                    StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
                    _ => StatusCode::BAD_REQUEST,
                };
                (status, json!("invalid_body"))
            }
            ApiError::UpstreamRejected(payload) => (StatusCode::BAD_REQUEST, payload),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, json!(message)),
            ApiError::Analysis => (StatusCode::INTERNAL_SERVER_ERROR, json!("analysis_error")),
        };

        (status, Json(json!({ "error": error }))).into_response()
    }
}

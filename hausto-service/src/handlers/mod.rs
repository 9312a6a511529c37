//! HTTP handlers for the hausto service.

pub mod analysis;
pub mod auth;
pub mod health;
pub mod metrics;

use axum::{extract::rejection::JsonRejection, Json};

use crate::error::ApiError;

/// Unwrap a JSON body, treating a request sent without a JSON content type
/// as an empty object so that field validation reports what is missing.
fn body_or_default<T: Default>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        Err(rejection) => Err(rejection.into()),
    }
}

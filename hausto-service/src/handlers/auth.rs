use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use super::body_or_default;
use crate::{
    dtos::ExchangeCodeRequest, error::ApiError, models::IdentityProfile, services::metrics,
    AppState,
};

/// `POST /auth/exchange`: trade a Google authorization code for the user's
/// email and profile.
pub async fn exchange_code(
    State(state): State<AppState>,
    payload: Result<Json<ExchangeCodeRequest>, JsonRejection>,
) -> Result<Json<IdentityProfile>, ApiError> {
    let request = body_or_default(payload)?;
    let code = request.code().ok_or(ApiError::InvalidInput("no_code"))?;

    match state.identity.exchange_code(code).await {
        Ok(profile) => {
            metrics::record_identity_exchange("ok");
            tracing::info!("Authorization code exchanged");
            Ok(Json(profile))
        }
        Err(e) => {
            metrics::record_identity_exchange(e.kind());
            tracing::error!(error = %e, kind = e.kind(), "Authorization code exchange failed");
            Err(e.into())
        }
    }
}

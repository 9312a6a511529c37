use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use super::body_or_default;
use crate::{dtos::AnalyzePropertyRequest, error::ApiError, models::AnalysisResult, AppState};

/// `POST /api/analyze-property`: caption each listing photo and rate the
/// listing against the user's preference.
pub async fn analyze_property(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzePropertyRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let request = body_or_default(payload)?;
    let image_urls = request
        .image_urls()
        .ok_or(ApiError::InvalidInput("no_images"))?;

    tracing::info!(
        images = image_urls.len(),
        title = request.title().unwrap_or("-"),
        listing_url = request.listing_url().unwrap_or("-"),
        "Analyzing property"
    );

    match state
        .analyzer
        .analyze(&image_urls, request.preference())
        .await
    {
        Ok(result) => {
            tracing::info!(vibe = %result.vibe, "Property analysis complete");
            Ok(Json(result))
        }
        Err(e) => {
            tracing::error!(error = %e, kind = e.kind(), "Property analysis failed");
            Err(ApiError::Analysis)
        }
    }
}

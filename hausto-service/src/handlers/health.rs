use axum::{response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe. Never fails.
pub async fn ping() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

/// Service identity for deploy tooling.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "hausto-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

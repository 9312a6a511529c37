//! Shared helpers for hausto-service integration tests.
//!
//! Upstreams are either the scripted `MockTextProvider` or `wiremock` servers;
//! nothing here touches the real Google or OpenAI endpoints.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use hausto_service::config::{
    AnalysisConfig, GoogleOAuthConfig, HaustoConfig, HttpConfig, OpenAiConfig,
};
use http_body_util::BodyExt;
use secrecy::Secret;
use serde_json::Value;
use std::time::Duration;
use tower::util::ServiceExt;

pub const TEST_CLIENT_ID: &str = "test-client-id";
pub const TEST_CLIENT_SECRET: &str = "test-client-secret";
pub const TEST_REDIRECT_URI: &str = "http://localhost:3000/callback";
pub const TEST_API_KEY: &str = "test-openai-key";

/// Configuration pointing every upstream at `upstream_base`.
///
/// Google endpoints live under `/token` and `/userinfo`, the completion API
/// under `/v1`.
pub fn test_config(upstream_base: &str) -> HaustoConfig {
    HaustoConfig {
        common: service_core::config::Config { port: 0 },
        service_name: "hausto-service".to_string(),
        log_level: "error".to_string(),
        otlp_endpoint: None,
        google: GoogleOAuthConfig {
            client_id: TEST_CLIENT_ID.to_string(),
            client_secret: Secret::new(TEST_CLIENT_SECRET.to_string()),
            redirect_uri: TEST_REDIRECT_URI.to_string(),
            token_url: format!("{}/token", upstream_base),
            userinfo_url: format!("{}/userinfo", upstream_base),
            timeout: Duration::from_secs(5),
        },
        openai: OpenAiConfig {
            api_key: Secret::new(TEST_API_KEY.to_string()),
            base_url: format!("{}/v1", upstream_base),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 60,
            timeout: Duration::from_secs(5),
        },
        analysis: AnalysisConfig {
            caption_concurrency: 4,
        },
        http: HttpConfig {
            max_body_bytes: 10 * 1024 * 1024,
            allowed_origins: vec!["*".to_string()],
        },
    }
}

/// Send a JSON POST through the router and decode the JSON reply.
pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Send a raw request through the router and decode the JSON reply.
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

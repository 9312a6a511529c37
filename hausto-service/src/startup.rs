//! Application startup and lifecycle management.
//!
//! The identity client and completion provider are built once here and
//! injected into every handler through [`AppState`].

use crate::config::HaustoConfig;
use crate::handlers;
use crate::services::providers::openai::OpenAiTextProvider;
use crate::services::providers::{GenerationParams, TextProvider};
use crate::services::{GoogleIdentityClient, IdentityProvider, PropertyAnalyzer};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::{request_id_middleware, REQUEST_ID_HEADER},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

/// Shared application state. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: HaustoConfig,
    pub identity: Arc<dyn IdentityProvider>,
    pub analyzer: PropertyAnalyzer,
}

impl AppState {
    pub fn new(
        config: HaustoConfig,
        identity: Arc<dyn IdentityProvider>,
        text_provider: Arc<dyn TextProvider>,
    ) -> Self {
        let params = GenerationParams {
            max_tokens: Some(config.openai.max_tokens),
        };
        let analyzer =
            PropertyAnalyzer::new(text_provider, params, config.analysis.caption_concurrency);

        Self {
            config,
            identity,
            analyzer,
        }
    }

    /// State backed by the real Google and OpenAI clients.
    pub fn from_config(config: HaustoConfig) -> Result<Self, AppError> {
        let identity = GoogleIdentityClient::new(config.google.clone()).map_err(|e| {
            tracing::error!("Failed to create Google identity client: {}", e);
            AppError::InternalError(e.into())
        })?;

        let text_provider = OpenAiTextProvider::new(config.openai.clone()).map_err(|e| {
            tracing::error!("Failed to create OpenAI provider: {}", e);
            AppError::InternalError(e.into())
        })?;

        tracing::info!(
            model = %config.openai.model,
            caption_concurrency = config.analysis.caption_concurrency,
            "Initialized OpenAI text provider"
        );

        Ok(Self::new(config, Arc::new(identity), Arc::new(text_provider)))
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let allow_origin = if allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed_origins.iter().filter_map(|o| {
            o.parse::<HeaderValue>()
                .map_err(|e| tracing::error!("Invalid CORS origin '{}': {}. Skipping.", o, e))
                .ok()
        }))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_router(state: AppState) -> Router {
    let max_body_bytes = state.config.http.max_body_bytes;
    let cors = cors_layer(&state.config.http.allowed_origins);

    Router::new()
        .route("/ping", get(handlers::health::ping))
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::metrics))
        .route("/auth/exchange", post(handlers::auth::exchange_code))
        .route(
            "/api/analyze-property",
            post(handlers::analysis::analyze_property),
        )
        .route_layer(from_fn(metrics_middleware))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            },
        ))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the real upstream clients.
    pub async fn build(config: HaustoConfig) -> Result<Self, AppError> {
        let state = AppState::from_config(config)?;
        Self::build_with_state(state).await
    }

    /// Bind the listener for an already assembled state
    /// (port 0 = random port for testing).
    pub async fn build_with_state(state: AppState) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], state.config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Hausto service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until Ctrl+C or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

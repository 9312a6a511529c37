//! service-core: Shared infrastructure for the hausto services.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;

pub use axum;
pub use serde_json;
pub use tower_http;
pub use tracing;

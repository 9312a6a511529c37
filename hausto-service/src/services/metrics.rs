//! Prometheus metrics for hausto-service.
//!
//! HTTP request metrics go through the `metrics` facade (see
//! `service_core::middleware::metrics`) and are rendered by the installed
//! Prometheus recorder. Service-specific series live in a `prometheus`
//! registry and are appended to the same scrape output.

use crate::models::VibeTier;
use anyhow::Context;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use service_core::error::AppError;
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub static COMPLETIONS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static COMPLETION_LATENCY_SECONDS: OnceLock<HistogramVec> = OnceLock::new();
pub static VIBE_TIERS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static IDENTITY_EXCHANGES_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize all metrics. Must be called once at startup.
pub fn init_metrics() -> Result<(), AppError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;
    let _ = METRICS_HANDLE.set(handle);

    let registry = Registry::new();

    // Completion calls by purpose (caption / rating) and outcome
    let completions = IntCounterVec::new(
        Opts::new("hausto_completions_total", "Total completion API calls"),
        &["provider", "purpose", "outcome"],
    )
    .context("Failed to create hausto_completions_total metric")?;

    let completion_latency = HistogramVec::new(
        HistogramOpts::new(
            "hausto_completion_latency_seconds",
            "Completion API latency in seconds",
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0]),
        &["provider", "purpose"],
    )
    .context("Failed to create hausto_completion_latency_seconds metric")?;

    let vibe_tiers = IntCounterVec::new(
        Opts::new("hausto_vibe_tiers_total", "Analyses by resulting vibe tier"),
        &["tier"],
    )
    .context("Failed to create hausto_vibe_tiers_total metric")?;

    let identity_exchanges = IntCounterVec::new(
        Opts::new(
            "hausto_identity_exchanges_total",
            "Authorization code exchanges by outcome",
        ),
        &["outcome"],
    )
    .context("Failed to create hausto_identity_exchanges_total metric")?;

    registry
        .register(Box::new(completions.clone()))
        .context("Failed to register hausto_completions_total")?;
    registry
        .register(Box::new(completion_latency.clone()))
        .context("Failed to register hausto_completion_latency_seconds")?;
    registry
        .register(Box::new(vibe_tiers.clone()))
        .context("Failed to register hausto_vibe_tiers_total")?;
    registry
        .register(Box::new(identity_exchanges.clone()))
        .context("Failed to register hausto_identity_exchanges_total")?;

    let _ = REGISTRY.set(registry);
    let _ = COMPLETIONS_TOTAL.set(completions);
    let _ = COMPLETION_LATENCY_SECONDS.set(completion_latency);
    let _ = VIBE_TIERS_TOTAL.set(vibe_tiers);
    let _ = IDENTITY_EXCHANGES_TOTAL.set(identity_exchanges);

    tracing::info!("Prometheus metrics initialized");
    Ok(())
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let mut output = METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string());

    if let Some(registry) = REGISTRY.get() {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&registry.gather(), &mut buffer) {
            tracing::error!(error = %e, "Failed to encode metrics");
        }
        output.push_str(&String::from_utf8_lossy(&buffer));
    }

    output
}

/// Record one completion call.
pub fn record_completion(provider: &str, purpose: &str, outcome: &str, duration_secs: f64) {
    if let Some(counter) = COMPLETIONS_TOTAL.get() {
        counter
            .with_label_values(&[provider, purpose, outcome])
            .inc();
    }
    if let Some(histogram) = COMPLETION_LATENCY_SECONDS.get() {
        histogram
            .with_label_values(&[provider, purpose])
            .observe(duration_secs);
    }
}

/// Record the tier an analysis resolved to.
pub fn record_vibe(tier: VibeTier) {
    if let Some(counter) = VIBE_TIERS_TOTAL.get() {
        counter.with_label_values(&[tier.as_str()]).inc();
    }
}

/// Record the outcome of an authorization code exchange.
pub fn record_identity_exchange(outcome: &str) {
    if let Some(counter) = IDENTITY_EXCHANGES_TOTAL.get() {
        counter.with_label_values(&[outcome]).inc();
    }
}

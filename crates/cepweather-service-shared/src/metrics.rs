//! Prometheus metrics infrastructure for the cepweather services.
//!
//! This module provides:
//! - [`MetricsConfig`]: Configuration for the metrics system
//! - [`init_metrics`]: Initialize the Prometheus metrics recorder
//! - [`metrics_handler`]: Axum handler for the `/metrics` endpoint
//! - Business metric helpers for lookups and upstream calls
//!
//! # Example
//!
//! ```no_run
//! use cepweather_service_shared::metrics::{MetricsConfig, init_metrics, metrics_handler};
//! use axum::{Router, routing::get};
//!
//! let config = MetricsConfig::default();
//! init_metrics(&config).expect("failed to initialize metrics");
//!
//! let app: Router = Router::new()
//!     .route("/metrics", get(metrics_handler));
//! ```

use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Route the metrics endpoint is served on.
pub const METRICS_PATH: &str = "/metrics";

/// Global Prometheus handle for rendering metrics.
static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Configuration for the metrics system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Whether metrics collection is enabled.
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl MetricsConfig {
    /// Create configuration from environment variables.
    ///
    /// - `METRICS_ENABLED`: "true" or "false" (default: true)
    pub fn from_env() -> Self {
        let enabled = std::env::var("METRICS_ENABLED")
            .map(|v| v.to_lowercase() != "false")
            .unwrap_or(true);

        Self { enabled }
    }
}

/// Errors that can occur during metrics initialization.
#[derive(Debug, Clone, Error)]
pub enum MetricsError {
    #[error("metrics are disabled")]
    Disabled,
    #[error("metrics recorder already initialized")]
    AlreadyInitialized,
    #[error("failed to install metrics recorder: {0}")]
    InstallFailed(String),
}

/// Initialize the Prometheus metrics recorder.
///
/// Must be called once at startup before any metrics are recorded. Metrics
/// recorded before this (or when it fails) go to the no-op recorder.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)?;

    Ok(())
}

/// Axum handler for the `/metrics` endpoint.
///
/// Returns Prometheus exposition format text.
pub async fn metrics_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|h| h.render())
        .unwrap_or_else(|| "# Metrics not initialized\n".to_string())
}

// =============================================================================
// Business Metrics Helpers
// =============================================================================

/// Record a lookup that produced a weather report.
///
/// Increments `cepweather_lookups_completed_total`.
pub fn record_lookup_completed(service: &str) {
    metrics::counter!(
        "cepweather_lookups_completed_total",
        "service" => service.to_string()
    )
    .increment(1);
}

/// Record a lookup that ended in an error response.
///
/// Increments `cepweather_lookups_failed_total`.
///
/// # Arguments
///
/// * `reason` - Failure label, see `ServiceError::reason`
/// * `service` - The service name (e.g., "input", "weather")
pub fn record_lookup_failed(reason: &str, service: &str) {
    metrics::counter!(
        "cepweather_lookups_failed_total",
        "reason" => reason.to_string(),
        "service" => service.to_string()
    )
    .increment(1);
}

/// Record a reported Celsius temperature to `cepweather_temperature_celsius`.
pub fn record_temperature_celsius(celsius: f64) {
    metrics::histogram!("cepweather_temperature_celsius").record(celsius);
}

/// Record how long an outbound call took.
///
/// Records to `cepweather_upstream_duration_seconds`, labelled by upstream
/// (e.g., "viacep", "weatherapi", "weather-service") and outcome ("ok",
/// "error").
pub fn record_upstream_latency(upstream: &str, outcome: &str, elapsed: Duration) {
    metrics::histogram!(
        "cepweather_upstream_duration_seconds",
        "upstream" => upstream.to_string(),
        "outcome" => outcome.to_string()
    )
    .record(elapsed.as_secs_f64());
}

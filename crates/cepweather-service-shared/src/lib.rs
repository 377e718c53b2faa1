//! Shared infrastructure for the cepweather HTTP services.
//!
//! This crate provides common functionality used by both service binaries:
//!
//! - [`AppState`]: Shared per-service context holding the outbound clients
//! - [`health_live`] / [`health_ready`]: Health check handlers for Kubernetes liveness/readiness probes
//! - [`ServiceError`]: Status code and plain-text body for every failure
//! - [`CommonConfig`]: Environment-based settings read at startup
//! - [`metrics`]: Prometheus metrics infrastructure
//! - [`logging`]: Structured JSON logging setup
//! - [`middleware`]: Request ID propagation and metrics middleware
//! - [`PostalCodeRequest`] with validation for both endpoints
//! - [`with_operational_routes`]: Health and metrics routes for a service router
//!
//! # Architecture
//!
//! The services follow a thin-handler pattern where all lookup logic resides
//! in `cepweather-lib`. This crate provides only HTTP glue:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Decode request JSON                                      │
//! │  - Validate the postal code                                 │
//! │  - Call cepweather-lib clients                              │
//! │  - Format response or plain-text error                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides collaborator fixtures and wiremock
//! helpers. Enable the `test-utils` feature to access it from dependent crates.

#![deny(warnings)]

mod config;
mod error;
mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod request;
mod routes;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{optional_var, required_var, CommonConfig, ConfigError, EnvLookup, ProcessEnv};
pub use error::{
    from_lib_error, ServiceError, MSG_INTERNAL_ERROR, MSG_INVALID_INPUT, MSG_INVALID_UPSTREAM_RESPONSE,
    MSG_INVALID_ZIPCODE, MSG_TEMPERATURE_FAILED, MSG_ZIPCODE_NOT_FOUND,
};
pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_lookup_completed, record_lookup_failed,
    record_temperature_celsius, record_upstream_latency, MetricsConfig, MetricsError,
    METRICS_PATH,
};
pub use middleware::{extract_or_generate_request_id, RequestId, RequestTrackingLayer};
pub use request::{parse_json_body, PostalCodeRequest, Validate};
pub use routes::with_operational_routes;
pub use state::{AppState, ServiceContext, Upstream};

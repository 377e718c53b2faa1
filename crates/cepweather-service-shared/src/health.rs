//! Health check handlers for Kubernetes probes.
//!
//! Provides `/health/live` and `/health/ready` endpoints that return JSON
//! status responses for Kubernetes liveness and readiness probes.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::state::{AppState, ServiceContext};

/// Health status response for liveness and readiness probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Status indicator: "ok" or "not_ready: <reason>".
    pub status: String,

    /// Service name for identification.
    pub service: String,

    /// Service version from build-time.
    pub version: String,

    /// RFC 3339 time the probe was answered.
    pub checked_at: String,

    /// Names of configured downstream dependencies (readiness only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub upstreams: Vec<String>,
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

impl HealthStatus {
    /// Create a healthy liveness status.
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            checked_at: now_rfc3339(),
            upstreams: Vec::new(),
        }
    }

    /// Create a ready status listing the configured upstreams.
    pub fn ready(service: &str, version: &str, upstreams: Vec<String>) -> Self {
        Self {
            upstreams,
            ..Self::alive(service, version)
        }
    }

    /// Create a not-ready status.
    pub fn not_ready(service: &str, version: &str, reason: &str) -> Self {
        Self {
            status: format!("not_ready: {}", reason),
            ..Self::alive(service, version)
        }
    }
}

/// Liveness probe handler.
///
/// Returns 200 OK if the process is serving. Does not touch upstreams.
///
/// ```text
/// GET /health/live
/// {"status":"ok","service":"weather","version":"0.1.0","checked_at":"2026-01-01T00:00:00Z"}
/// ```
pub async fn health_live<C: ServiceContext>(State(state): State<AppState<C>>) -> impl IntoResponse {
    let status = HealthStatus::alive(state.service_name(), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// Readiness probe handler.
///
/// Returns 200 OK listing the configured upstreams, or 503 when the service
/// has no upstream configured (it could not answer a lookup).
pub async fn health_ready<C: ServiceContext>(State(state): State<AppState<C>>) -> Response {
    let service = state.service_name();
    let version = env!("CARGO_PKG_VERSION");

    let upstreams: Vec<String> = state
        .upstreams()
        .into_iter()
        .filter(|u| !u.url.is_empty())
        .map(|u| u.name.to_string())
        .collect();

    if upstreams.is_empty() {
        let status = HealthStatus::not_ready(service, version, "no upstreams configured");
        return (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response();
    }

    let status = HealthStatus::ready(service, version, upstreams);
    (StatusCode::OK, Json(status)).into_response()
}

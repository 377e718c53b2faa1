//! Operational endpoints mounted by every service.

use axum::{routing::get, Router};

use crate::health::{health_live, health_ready};
use crate::metrics::{metrics_handler, MetricsConfig, METRICS_PATH};
use crate::state::{AppState, ServiceContext};

/// Add `/health/live`, `/health/ready` and, when enabled, the metrics
/// endpoint at `/metrics`.
pub fn with_operational_routes<C: ServiceContext>(
    router: Router<AppState<C>>,
    metrics: &MetricsConfig,
) -> Router<AppState<C>> {
    let router = router
        .route("/health/live", get(health_live::<C>))
        .route("/health/ready", get(health_ready::<C>));

    if metrics.enabled {
        router.route(METRICS_PATH, get(metrics_handler))
    } else {
        router
    }
}

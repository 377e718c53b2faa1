//! Input service binary. See the library crate for endpoints and
//! configuration.

use std::net::SocketAddr;

use tracing::{error, info};

use cepweather_service_input::{router, InputConfig, InputContext, SERVICE_NAME};
use cepweather_service_shared::{init_logging, init_metrics, AppState, LoggingConfig, MetricsConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_config = LoggingConfig::from_env().with_service(SERVICE_NAME);
    init_logging(&logging_config);

    let metrics_config = MetricsConfig::from_env();
    if let Err(e) = init_metrics(&metrics_config) {
        // Log but don't fail - metrics are optional
        tracing::warn!(error = %e, "failed to initialize metrics, continuing without metrics");
    }

    let config = InputConfig::from_env().map_err(|e| {
        error!(error = %e, "invalid configuration");
        e
    })?;

    info!(
        port = config.common.port,
        weather_service = %config.weather_service_url,
        timeout_secs = config.common.upstream_timeout.as_secs(),
        zipkin_endpoint = ?config.common.zipkin_endpoint,
        "starting input service"
    );

    let context = InputContext::from_config(&config).map_err(|e| {
        error!(error = %e, "failed to build weather service client");
        e
    })?;

    let app = router(AppState::new(context), &metrics_config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

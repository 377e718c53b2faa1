//! Input HTTP service.
//!
//! Validates a CEP and relays it to the weather service, answering with the
//! weather service's report or status.
//!
//! # Endpoints
//!
//! - `POST /cep` - Validate a postal code and forward it
//! - `GET /metrics` - Prometheus metrics endpoint
//! - `GET /health/live` - Kubernetes liveness probe
//! - `GET /health/ready` - Kubernetes readiness probe
//!
//! # Configuration
//!
//! - `SERVICE_B_URL` - Full URL of the weather service's `/weather` endpoint (required)
//! - `SERVICE_PORT` - HTTP port (default: 8081)
//! - `UPSTREAM_TIMEOUT_SECS` - Timeout for the forwarded call (default: 10)
//! - `ZIPKIN_ENDPOINT` - Span collector address (optional)

use std::time::Instant;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use cepweather_lib::{build_http_client, RelayReply, WeatherReport, WeatherServiceClient};
use cepweather_service_shared::{
    from_lib_error, parse_json_body, record_lookup_completed, record_lookup_failed,
    record_upstream_latency, required_var, with_operational_routes, AppState, CommonConfig,
    ConfigError, EnvLookup, MetricsConfig, PostalCodeRequest, ProcessEnv, RequestId,
    RequestTrackingLayer, ServiceContext, ServiceError, Upstream, Validate,
};

/// Name used in logs, metrics and health responses.
pub const SERVICE_NAME: &str = "input";

/// Port used when `SERVICE_PORT` is unset.
pub const DEFAULT_PORT: u16 = 8081;

#[derive(Debug, Clone)]
pub struct InputConfig {
    pub common: CommonConfig,
    /// Weather service endpoint, e.g. `http://service-b:8082/weather`.
    pub weather_service_url: String,
}

impl InputConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&ProcessEnv)
    }

    pub fn from_lookup(env: &impl EnvLookup) -> Result<Self, ConfigError> {
        Ok(Self {
            common: CommonConfig::from_lookup(DEFAULT_PORT, env)?,
            weather_service_url: required_var(env, "SERVICE_B_URL")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct InputContext {
    pub relay: WeatherServiceClient,
}

impl InputContext {
    pub fn new(relay: WeatherServiceClient) -> Self {
        Self { relay }
    }

    pub fn from_config(config: &InputConfig) -> Result<Self, ConfigError> {
        let http = build_http_client(config.common.upstream_timeout)?;
        Ok(Self::new(WeatherServiceClient::new(
            http,
            &config.weather_service_url,
        )?))
    }
}

impl ServiceContext for InputContext {
    fn service_name(&self) -> &'static str {
        SERVICE_NAME
    }

    fn upstreams(&self) -> Vec<Upstream> {
        vec![Upstream::new("weather-service", self.relay.url())]
    }
}

/// Build the service router.
pub fn router(state: AppState<InputContext>, metrics: &MetricsConfig) -> Router {
    let routes = Router::new().route("/cep", post(cep_handler));

    with_operational_routes(routes, metrics)
        .layer(TraceLayer::new_for_http())
        .layer(RequestTrackingLayer)
        .with_state(state)
}

/// Handle POST /cep requests.
async fn cep_handler(
    State(state): State<AppState<InputContext>>,
    request_id: RequestId,
    body: Bytes,
) -> Response {
    match relay(state.context(), &request_id, &body).await {
        Ok(report) => {
            record_lookup_completed(SERVICE_NAME);
            (StatusCode::OK, Json(report)).into_response()
        }
        Err(error) => {
            record_lookup_failed(error.reason(), SERVICE_NAME);
            error.into_response()
        }
    }
}

async fn relay(
    context: &InputContext,
    request_id: &RequestId,
    body: &[u8],
) -> Result<WeatherReport, ServiceError> {
    let request: PostalCodeRequest = parse_json_body(body)?;
    let cep = request.validate()?;

    let started = Instant::now();
    let reply = context.relay.forward(&cep, request_id.as_str()).await;
    let outcome = match &reply {
        Ok(RelayReply::Report(_)) => "ok",
        _ => "error",
    };
    record_upstream_latency("weather-service", outcome, started.elapsed());

    match reply {
        Ok(RelayReply::Report(report)) => {
            info!(cep = %cep, city = %report.city(), temp_c = report.celsius(), "weather relayed");
            Ok(report)
        }
        Ok(RelayReply::Status(status)) => {
            info!(cep = %cep, status = status.as_u16(), "weather service declined");
            Err(ServiceError::UpstreamStatus(status))
        }
        Err(e) => {
            warn!(cep = %cep, error = %e, "relay to weather service failed");
            Err(from_lib_error(&e))
        }
    }
}

//! Weather HTTP service.
//!
//! Resolves a CEP to its city through ViaCEP, looks up the current
//! temperature through WeatherAPI, and answers with the temperature in
//! Celsius, Fahrenheit and Kelvin.
//!
//! # Endpoints
//!
//! - `POST /weather` - Report the current temperature for a postal code
//! - `GET /metrics` - Prometheus metrics endpoint
//! - `GET /health/live` - Kubernetes liveness probe
//! - `GET /health/ready` - Kubernetes readiness probe
//!
//! # Configuration
//!
//! - `WEATHER_API_KEY` - WeatherAPI access key (required)
//! - `VIACEP_BASE_URL` - Location lookup base URL (default: `https://viacep.com.br`)
//! - `WEATHERAPI_BASE_URL` - Weather lookup base URL (default: `http://api.weatherapi.com`)
//! - `SERVICE_PORT` - HTTP port (default: 8082)
//! - `UPSTREAM_TIMEOUT_SECS` - Timeout for outbound calls (default: 10)
//! - `ZIPKIN_ENDPOINT` - Span collector address (optional)

use std::fmt;
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
use tracing::{field, info, info_span, warn, Instrument, Span};

use cepweather_lib::{
    build_http_client, LocationClient, WeatherClient, WeatherReport, DEFAULT_VIACEP_BASE_URL,
    DEFAULT_WEATHERAPI_BASE_URL,
};
use cepweather_service_shared::{
    optional_var, parse_json_body, record_lookup_completed, record_lookup_failed,
    record_temperature_celsius, record_upstream_latency, required_var, with_operational_routes,
    AppState, CommonConfig, ConfigError, EnvLookup, MetricsConfig, PostalCodeRequest, ProcessEnv,
    RequestId, RequestTrackingLayer, ServiceContext, ServiceError, Upstream, Validate,
};

/// Name used in logs, metrics and health responses.
pub const SERVICE_NAME: &str = "weather";

/// Port used when `SERVICE_PORT` is unset.
pub const DEFAULT_PORT: u16 = 8082;

/// Start-up configuration for the weather service.
#[derive(Clone)]
pub struct WeatherConfig {
    pub common: CommonConfig,
    pub viacep_base_url: String,
    pub weatherapi_base_url: String,
    pub api_key: String,
}

impl fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("common", &self.common)
            .field("viacep_base_url", &self.viacep_base_url)
            .field("weatherapi_base_url", &self.weatherapi_base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl WeatherConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&ProcessEnv)
    }

    /// Read the configuration; fails if `WEATHER_API_KEY` is missing.
    pub fn from_lookup(env: &impl EnvLookup) -> Result<Self, ConfigError> {
        Ok(Self {
            common: CommonConfig::from_lookup(DEFAULT_PORT, env)?,
            viacep_base_url: optional_var(env, "VIACEP_BASE_URL")
                .unwrap_or_else(|| DEFAULT_VIACEP_BASE_URL.to_string()),
            weatherapi_base_url: optional_var(env, "WEATHERAPI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_WEATHERAPI_BASE_URL.to_string()),
            api_key: required_var(env, "WEATHER_API_KEY")?,
        })
    }
}

/// Outbound clients shared by every request.
#[derive(Debug, Clone)]
pub struct WeatherContext {
    pub location: LocationClient,
    pub weather: WeatherClient,
}

impl WeatherContext {
    pub fn new(location: LocationClient, weather: WeatherClient) -> Self {
        Self { location, weather }
    }

    /// Build both clients over one connection pool.
    pub fn from_config(config: &WeatherConfig) -> Result<Self, ConfigError> {
        let http = build_http_client(config.common.upstream_timeout)?;
        let location = LocationClient::new(http.clone(), &config.viacep_base_url)?;
        let weather = WeatherClient::new(http, &config.weatherapi_base_url, config.api_key.clone())?;
        Ok(Self::new(location, weather))
    }
}

impl ServiceContext for WeatherContext {
    fn service_name(&self) -> &'static str {
        SERVICE_NAME
    }

    fn upstreams(&self) -> Vec<Upstream> {
        vec![
            Upstream::new("viacep", self.location.base_url()),
            Upstream::new("weatherapi", self.weather.base_url()),
        ]
    }
}

/// Build the service router.
pub fn router(state: AppState<WeatherContext>, metrics: &MetricsConfig) -> Router {
    let routes = Router::new().route("/weather", post(weather_handler));

    with_operational_routes(routes, metrics)
        .layer(TraceLayer::new_for_http())
        .layer(RequestTrackingLayer)
        .with_state(state)
}

/// Handle POST /weather requests.
async fn weather_handler(
    State(state): State<AppState<WeatherContext>>,
    request_id: RequestId,
    body: Bytes,
) -> Response {
    let span = info_span!("get_weather", request_id = %request_id, cep = field::Empty);

    match report_for(state.context(), &body).instrument(span).await {
        Ok(report) => {
            record_lookup_completed(SERVICE_NAME);
            record_temperature_celsius(report.celsius());
            (StatusCode::OK, Json(report)).into_response()
        }
        Err(error) => {
            record_lookup_failed(error.reason(), SERVICE_NAME);
            error.into_response()
        }
    }
}

async fn report_for(context: &WeatherContext, body: &[u8]) -> Result<WeatherReport, ServiceError> {
    let request: PostalCodeRequest = parse_json_body(body)?;
    let cep = request.validate()?;
    Span::current().record("cep", cep.as_str());

    let started = Instant::now();
    let city = context.location.resolve_city(&cep).await;
    record_upstream_latency("viacep", outcome(&city), started.elapsed());
    let city = city.map_err(|e| {
        warn!(error = %e, "location lookup failed");
        ServiceError::ZipcodeNotFound
    })?;

    let started = Instant::now();
    let celsius = context.weather.current_celsius(&city).await;
    record_upstream_latency("weatherapi", outcome(&celsius), started.elapsed());
    let celsius = celsius.map_err(|e| {
        warn!(error = %e, city = %city, "temperature lookup failed");
        ServiceError::TemperatureUnavailable
    })?;

    let report = WeatherReport::new(city, celsius);
    info!(
        city = %report.city(),
        temp_c = report.celsius(),
        temp_f = report.fahrenheit(),
        temp_k = report.kelvin(),
        "weather resolved"
    );
    Ok(report)
}

fn outcome<T, E>(result: &Result<T, E>) -> &'static str {
    if result.is_ok() {
        "ok"
    } else {
        "error"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = WeatherConfig::from_lookup(&env(&[("WEATHER_API_KEY", "k")])).unwrap();
        assert_eq!(config.common.port, DEFAULT_PORT);
        assert_eq!(config.viacep_base_url, DEFAULT_VIACEP_BASE_URL);
        assert_eq!(config.weatherapi_base_url, DEFAULT_WEATHERAPI_BASE_URL);
        assert_eq!(config.api_key, "k");
    }

    #[test]
    fn test_config_requires_api_key() {
        let err = WeatherConfig::from_lookup(&env(&[])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingVar {
                name: "WEATHER_API_KEY"
            }
        ));
    }

    #[test]
    fn test_config_debug_redacts_key() {
        let config = WeatherConfig::from_lookup(&env(&[("WEATHER_API_KEY", "s3cret")])).unwrap();
        assert!(!format!("{:?}", config).contains("s3cret"));
    }

    #[test]
    fn test_context_rejects_bad_base_url() {
        let config = WeatherConfig::from_lookup(&env(&[
            ("WEATHER_API_KEY", "k"),
            ("VIACEP_BASE_URL", "ftp://viacep.com.br"),
        ]))
        .unwrap();
        assert!(matches!(
            WeatherContext::from_config(&config),
            Err(ConfigError::Client(_))
        ));
    }

    #[test]
    fn test_context_upstreams() {
        let config = WeatherConfig::from_lookup(&env(&[("WEATHER_API_KEY", "k")])).unwrap();
        let context = WeatherContext::from_config(&config).unwrap();
        let names: Vec<_> = context.upstreams().iter().map(|u| u.name).collect();
        assert_eq!(names, vec!["viacep", "weatherapi"]);
    }

    #[test]
    fn test_outcome_label() {
        assert_eq!(outcome::<(), ()>(&Ok(())), "ok");
        assert_eq!(outcome::<(), ()>(&Err(())), "error");
    }
}

//! Span names and fields opened while relaying `POST /cep`.

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cepweather_lib::{build_http_client, WeatherServiceClient, DEFAULT_TIMEOUT};
use cepweather_service_input::{router, InputContext};
use cepweather_service_shared::test_utils::{SpanCapture, SAO_PAULO_CEP, UNKNOWN_CEP};
use cepweather_service_shared::{AppState, MetricsConfig};

fn server_for(weather_service_url: &str) -> TestServer {
    let http = build_http_client(DEFAULT_TIMEOUT).unwrap();
    let relay = WeatherServiceClient::new(http, weather_service_url).unwrap();
    TestServer::new(router(
        AppState::new(InputContext::new(relay)),
        &MetricsConfig::default(),
    ))
    .unwrap()
}

#[tokio::test]
async fn forward_span_records_operation_and_upstream_status() {
    let weather = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&weather)
        .await;
    let server = server_for(&format!("{}/weather", weather.uri()));

    let (capture, _guard) = SpanCapture::install();
    let response = server.post("/cep").json(&json!({ "cep": UNKNOWN_CEP })).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let forward = capture.only("forward_to_weather_service");
    assert_eq!(forward.field("operation"), Some("handle_cep"));
    assert_eq!(forward.field("cep"), Some(UNKNOWN_CEP));
    assert_eq!(forward.field("upstream_status"), Some("404"));
}

#[tokio::test]
async fn unreachable_upstream_leaves_status_unrecorded() {
    let server = server_for("http://127.0.0.1:1/weather");

    let (capture, _guard) = SpanCapture::install();
    let response = server.post("/cep").json(&json!({ "cep": SAO_PAULO_CEP })).await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    let forward = capture.only("forward_to_weather_service");
    assert_eq!(forward.field("operation"), Some("handle_cep"));
    assert_eq!(forward.field("upstream_status"), None);
}

#[tokio::test]
async fn invalid_cep_is_not_forwarded() {
    let server = server_for("http://127.0.0.1:1/weather");

    let (capture, _guard) = SpanCapture::install();
    let response = server.post("/cep").json(&json!({ "cep": "123" })).await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

    assert!(capture.named("forward_to_weather_service").is_empty());
}

//! Span names and fields opened while answering `POST /weather`.

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::json;
use wiremock::MockServer;

use cepweather_lib::{build_http_client, LocationClient, WeatherClient, DEFAULT_TIMEOUT};
use cepweather_service_shared::test_utils::{
    mount_viacep, mount_weatherapi, mount_weatherapi_status, viacep_found, viacep_not_found,
    SpanCapture, SAO_PAULO_CEP, SAO_PAULO_CITY, TEST_API_KEY, UNKNOWN_CEP,
};
use cepweather_service_shared::{AppState, MetricsConfig};
use cepweather_service_weather::{router, WeatherContext};

fn server_for(viacep: &MockServer, weatherapi: &MockServer) -> TestServer {
    let http = build_http_client(DEFAULT_TIMEOUT).unwrap();
    let context = WeatherContext::new(
        LocationClient::new(http.clone(), &viacep.uri()).unwrap(),
        WeatherClient::new(http, &weatherapi.uri(), TEST_API_KEY).unwrap(),
    );
    TestServer::new(router(AppState::new(context), &MetricsConfig::default())).unwrap()
}

#[tokio::test]
async fn successful_lookup_records_location_and_temperature() {
    let viacep = MockServer::start().await;
    let weatherapi = MockServer::start().await;
    mount_viacep(&viacep, SAO_PAULO_CEP, viacep_found(SAO_PAULO_CITY)).await;
    mount_weatherapi(&weatherapi, SAO_PAULO_CITY, 25.0).await;
    let server = server_for(&viacep, &weatherapi);

    let (capture, _guard) = SpanCapture::install();
    let response = server
        .post("/weather")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("span-req"),
        )
        .json(&json!({ "cep": SAO_PAULO_CEP }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let handler = capture.only("get_weather");
    assert_eq!(handler.field("request_id"), Some("span-req"));
    assert_eq!(handler.field("cep"), Some(SAO_PAULO_CEP));

    let location = capture.only("resolve_location");
    assert_eq!(location.parent, Some("get_weather"));
    assert_eq!(location.field("cep"), Some(SAO_PAULO_CEP));
    assert_eq!(location.field("location"), Some(SAO_PAULO_CITY));

    let temperature = capture.only("resolve_temperature");
    assert_eq!(temperature.parent, Some("get_weather"));
    assert_eq!(temperature.field("location"), Some(SAO_PAULO_CITY));
    assert_eq!(temperature.field("temp_c"), Some("25.0"));
}

#[tokio::test]
async fn unknown_cep_leaves_location_unrecorded() {
    let viacep = MockServer::start().await;
    let weatherapi = MockServer::start().await;
    mount_viacep(&viacep, UNKNOWN_CEP, viacep_not_found()).await;
    let server = server_for(&viacep, &weatherapi);

    let (capture, _guard) = SpanCapture::install();
    let response = server
        .post("/weather")
        .json(&json!({ "cep": UNKNOWN_CEP }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let location = capture.only("resolve_location");
    assert_eq!(location.field("cep"), Some(UNKNOWN_CEP));
    assert_eq!(location.field("location"), None);
    assert!(capture.named("resolve_temperature").is_empty());
}

#[tokio::test]
async fn weather_failure_leaves_temperature_unrecorded() {
    let viacep = MockServer::start().await;
    let weatherapi = MockServer::start().await;
    mount_viacep(&viacep, SAO_PAULO_CEP, viacep_found(SAO_PAULO_CITY)).await;
    mount_weatherapi_status(&weatherapi, 500).await;
    let server = server_for(&viacep, &weatherapi);

    let (capture, _guard) = SpanCapture::install();
    let response = server
        .post("/weather")
        .json(&json!({ "cep": SAO_PAULO_CEP }))
        .await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    assert_eq!(
        capture.only("resolve_location").field("location"),
        Some(SAO_PAULO_CITY)
    );
    let temperature = capture.only("resolve_temperature");
    assert_eq!(temperature.field("location"), Some(SAO_PAULO_CITY));
    assert_eq!(temperature.field("temp_c"), None);
}

#[tokio::test]
async fn invalid_cep_opens_no_lookup_spans() {
    let viacep = MockServer::start().await;
    let weatherapi = MockServer::start().await;
    let server = server_for(&viacep, &weatherapi);

    let (capture, _guard) = SpanCapture::install();
    let response = server.post("/weather").json(&json!({ "cep": "123" })).await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(capture.only("get_weather").field("cep"), None);
    assert!(capture.named("resolve_location").is_empty());
    assert!(capture.named("resolve_temperature").is_empty());
}

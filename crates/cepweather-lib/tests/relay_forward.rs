//! Integration tests for the weather service client used by the input service.

use cepweather_lib::{
    build_http_client, Error, PostalCode, RelayReply, WeatherReport, WeatherServiceClient,
    DEFAULT_TIMEOUT,
};
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> WeatherServiceClient {
    let http = build_http_client(DEFAULT_TIMEOUT).unwrap();
    WeatherServiceClient::new(http, &format!("{}/weather", server.uri())).unwrap()
}

fn cep() -> PostalCode {
    PostalCode::parse("01001000").unwrap()
}

#[tokio::test]
async fn forwards_code_and_request_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/weather"))
        .and(header("x-request-id", "req-abc"))
        .and(body_json(json!({"cep": "01001000"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "city": "São Paulo", "temp_C": 25.0, "temp_F": 77.0, "temp_K": 298.15
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client_for(&server).forward(&cep(), "req-abc").await.unwrap();
    assert_eq!(reply, RelayReply::Report(WeatherReport::new("São Paulo", 25.0)));
}

#[tokio::test]
async fn non_200_is_passed_back_as_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(404).set_body_string("can not find zipcode"))
        .mount(&server)
        .await;

    let reply = client_for(&server).forward(&cep(), "req-1").await.unwrap();
    assert_eq!(reply, RelayReply::Status(StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn undecodable_200_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server).forward(&cep(), "req-2").await.unwrap_err();
    assert!(matches!(err, Error::UpstreamDecode { .. }));
}

#[tokio::test]
async fn unreachable_service_is_reported() {
    let http = build_http_client(DEFAULT_TIMEOUT).unwrap();
    let client = WeatherServiceClient::new(http, "http://127.0.0.1:1/weather").unwrap();

    let err = client.forward(&cep(), "req-3").await.unwrap_err();
    assert!(matches!(err, Error::UpstreamUnreachable { .. }));
}

#[tokio::test]
async fn endpoint_is_posted_to_as_configured() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/weather/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let http = build_http_client(DEFAULT_TIMEOUT).unwrap();
    let client =
        WeatherServiceClient::new(http, &format!("{}/weather/", server.uri())).unwrap();

    let reply = client.forward(&cep(), "req-slash").await.unwrap();
    assert_eq!(reply, RelayReply::Status(StatusCode::NOT_FOUND));
}

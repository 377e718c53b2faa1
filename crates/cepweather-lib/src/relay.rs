//! Client the input service uses to forward a postal code to the weather service.

use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::{debug, field, info_span, warn, Instrument, Span};

use crate::cep::PostalCode;
use crate::error::{Error, Result};
use crate::http::validate_url;
use crate::report::WeatherReport;

/// Header carrying the correlation ID between the two services.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// What the weather service answered.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayReply {
    /// 200 with a decodable report.
    Report(WeatherReport),
    /// Any other status; the body is not inspected.
    Status(StatusCode),
}

#[derive(Serialize)]
struct ForwardBody<'a> {
    cep: &'a PostalCode,
}

/// Client for the weather service's `POST /weather` endpoint.
#[derive(Debug, Clone)]
pub struct WeatherServiceClient {
    client: Client,
    url: String,
}

impl WeatherServiceClient {
    /// `url` is the full endpoint URL, e.g. `http://service-b:8082/weather`,
    /// and is posted to exactly as given.
    pub fn new(client: Client, url: &str) -> Result<Self> {
        validate_url(url)?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Forward `cep` as `{"cep": "..."}` and interpret the answer.
    ///
    /// Runs inside a `forward_to_weather_service` span. `request_id` is sent
    /// as `X-Request-ID` so both services log under the same correlation ID.
    pub async fn forward(&self, cep: &PostalCode, request_id: &str) -> Result<RelayReply> {
        let span = info_span!(
            "forward_to_weather_service",
            operation = "handle_cep",
            cep = %cep,
            upstream_status = field::Empty,
        );

        async {
            debug!(url = %self.url, "forwarding postal code");

            let response = self
                .client
                .post(&self.url)
                .header(REQUEST_ID_HEADER, request_id)
                .json(&ForwardBody { cep })
                .send()
                .await
                .map_err(|e| {
                    warn!(error = %e, "weather service unreachable");
                    Error::UpstreamUnreachable {
                        url: self.url.clone(),
                        source: e,
                    }
                })?;

            let status = response.status();
            Span::current().record("upstream_status", status.as_u16());

            if status != StatusCode::OK {
                debug!(status = status.as_u16(), "weather service returned non-200");
                return Ok(RelayReply::Status(status));
            }

            let body = response.bytes().await.map_err(|e| Error::UpstreamDecode {
                message: e.to_string(),
            })?;

            let report: WeatherReport = serde_json::from_slice(&body).map_err(|e| {
                warn!(error = %e, "failed to decode weather service response");
                Error::UpstreamDecode {
                    message: e.to_string(),
                }
            })?;

            Ok(RelayReply::Report(report))
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_body_shape() {
        let cep = PostalCode::parse("01001000").unwrap();
        let json = serde_json::to_string(&ForwardBody { cep: &cep }).unwrap();
        assert_eq!(json, r#"{"cep":"01001000"}"#);
    }

    #[test]
    fn keeps_endpoint_path() {
        let client =
            WeatherServiceClient::new(Client::new(), "http://localhost:8082/weather").unwrap();
        assert_eq!(client.url(), "http://localhost:8082/weather");
    }

    #[test]
    fn keeps_trailing_slash_on_endpoint() {
        let client =
            WeatherServiceClient::new(Client::new(), "http://localhost:8082/weather/").unwrap();
        assert_eq!(client.url(), "http://localhost:8082/weather/");
    }

    #[test]
    fn rejects_invalid_endpoint() {
        assert!(WeatherServiceClient::new(Client::new(), "").is_err());
    }
}

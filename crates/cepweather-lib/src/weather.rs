//! City to current temperature resolution against the WeatherAPI service.

use std::fmt;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, field, info_span, warn, Instrument, Span};

use crate::error::{Error, LookupFailure, Result};
use crate::http::normalize_base_url;

/// Public WeatherAPI endpoint.
pub const DEFAULT_WEATHERAPI_BASE_URL: &str = "http://api.weatherapi.com";

const CURRENT_PATH: &str = "/v1/current.json";

/// Subset of the `current.json` payload this crate reads.
#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    #[serde(default)]
    location: Option<ReportedLocation>,
    current: CurrentConditions,
}

#[derive(Debug, Deserialize)]
struct ReportedLocation {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temp_c: f64,
}

/// Client for the weather collaborator.
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl fmt::Debug for WeatherClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl WeatherClient {
    pub fn new(client: Client, base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client,
            base_url: normalize_base_url(base_url)?,
            api_key: api_key.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current temperature in Celsius for `city`.
    ///
    /// The city name is sent as the form-encoded `q` query parameter; the
    /// access key travels as `key` and is never logged.
    pub async fn current_celsius(&self, city: &str) -> Result<f64> {
        let span = info_span!(
            "resolve_temperature",
            location = %city,
            temp_c = field::Empty,
        );

        async {
            let celsius = self.fetch_celsius(city).await?;
            Span::current().record("temp_c", celsius);
            Ok(celsius)
        }
        .instrument(span)
        .await
    }

    async fn fetch_celsius(&self, city: &str) -> Result<f64> {
        let url = format!("{}{}", self.base_url, CURRENT_PATH);
        debug!(url = %url, "fetching temperature");

        let lookup_failed = |failure| Error::WeatherLookupFailed {
            city: city.to_string(),
            failure,
        };

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", city)])
            .send()
            .await
            .map_err(|e| {
                // Strip the URL: it carries the access key.
                let e = e.without_url();
                warn!(error = %e, "weather request failed");
                lookup_failed(LookupFailure::Transport(e))
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "unexpected weather response status");
            return Err(lookup_failed(LookupFailure::Status(status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| lookup_failed(LookupFailure::Transport(e.without_url())))?;

        let decoded: CurrentWeatherResponse = serde_json::from_slice(&body).map_err(|e| {
            warn!(error = %e, "failed to decode weather response");
            Error::WeatherParse {
                city: city.to_string(),
                message: e.to_string(),
            }
        })?;

        if let Some(location) = &decoded.location {
            debug!(reported_location = %location.name, "weather provider matched location");
        }

        Ok(decoded.current.temp_c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_api_key() {
        let client = WeatherClient::new(Client::new(), DEFAULT_WEATHERAPI_BASE_URL, "s3cr3t").unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("s3cr3t"));
        assert!(debug.contains("redacted"));
    }

    #[test]
    fn decodes_nested_current_temperature() {
        let json = r#"{"location":{"name":"Sao Paulo","country":"Brazil"},"current":{"temp_c":21.4,"temp_f":70.5}}"#;
        let decoded: CurrentWeatherResponse = serde_json::from_str(json).unwrap();
        assert_eq!(decoded.current.temp_c, 21.4);
    }

    #[test]
    fn location_block_is_optional() {
        let decoded: CurrentWeatherResponse =
            serde_json::from_str(r#"{"current":{"temp_c":-3.0}}"#).unwrap();
        assert_eq!(decoded.current.temp_c, -3.0);
    }

    #[test]
    fn missing_current_temperature_fails_to_decode() {
        assert!(serde_json::from_str::<CurrentWeatherResponse>(r#"{"location":{"name":"X"}}"#).is_err());
        assert!(serde_json::from_str::<CurrentWeatherResponse>(r#"{"current":{}}"#).is_err());
    }
}

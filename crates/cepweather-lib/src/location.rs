//! Postal code to city resolution against the ViaCEP API.
//!
//! ViaCEP answers `GET /ws/{cep}/json/` with a flat JSON object. A code that
//! is well-formed but unassigned still gets a 200, with an `erro` field in
//! place of the address:
//!
//! ```json
//! {"cep":"01001-000","logradouro":"Praça da Sé","localidade":"São Paulo","uf":"SP"}
//! {"erro":true}
//! ```

use reqwest::Client;
use serde_json::{Map, Value};
use tracing::{debug, field, info_span, warn, Instrument, Span};

use crate::cep::PostalCode;
use crate::error::{Error, LookupFailure, Result};
use crate::http::normalize_base_url;

/// Public ViaCEP endpoint.
pub const DEFAULT_VIACEP_BASE_URL: &str = "https://viacep.com.br";

const NOT_FOUND_MARKER: &str = "erro";
const CITY_FIELD: &str = "localidade";

/// Client for the postal code lookup collaborator.
#[derive(Debug, Clone)]
pub struct LocationClient {
    client: Client,
    base_url: String,
}

impl LocationClient {
    /// Create a client rooted at `base_url` (scheme and host, no path).
    pub fn new(client: Client, base_url: &str) -> Result<Self> {
        Ok(Self {
            client,
            base_url: normalize_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL queried for `cep`.
    pub fn lookup_url(&self, cep: &PostalCode) -> String {
        format!("{}/ws/{}/json/", self.base_url, cep)
    }

    /// Resolve `cep` to its city name.
    ///
    /// Runs inside a `resolve_location` span tagged with the code and, on
    /// success, the resolved location.
    pub async fn resolve_city(&self, cep: &PostalCode) -> Result<String> {
        let span = info_span!(
            "resolve_location",
            cep = %cep,
            location = field::Empty,
        );

        async {
            let city = self.fetch_city(cep).await?;
            Span::current().record("location", city.as_str());
            Ok(city)
        }
        .instrument(span)
        .await
    }

    async fn fetch_city(&self, cep: &PostalCode) -> Result<String> {
        let url = self.lookup_url(cep);
        debug!(url = %url, "fetching location");

        let lookup_failed = |failure| Error::LocationLookupFailed {
            cep: cep.to_string(),
            failure,
        };

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(error = %e, "location request failed");
            lookup_failed(LookupFailure::Transport(e))
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "unexpected location response status");
            return Err(lookup_failed(LookupFailure::Status(status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| lookup_failed(LookupFailure::Transport(e)))?;

        let object: Map<String, Value> = serde_json::from_slice(&body).map_err(|e| {
            warn!(error = %e, "failed to decode location response");
            Error::LocationParse {
                cep: cep.to_string(),
                message: e.to_string(),
            }
        })?;

        city_from_response(cep, &object)
    }
}

fn city_from_response(cep: &PostalCode, object: &Map<String, Value>) -> Result<String> {
    if object.contains_key(NOT_FOUND_MARKER) {
        debug!("postal code not found");
        return Err(Error::LocationLookupFailed {
            cep: cep.to_string(),
            failure: LookupFailure::NotFound,
        });
    }

    match object.get(CITY_FIELD) {
        Some(Value::String(city)) => Ok(city.clone()),
        Some(other) => Err(Error::LocationParse {
            cep: cep.to_string(),
            message: format!("'{CITY_FIELD}' is not a string: {other}"),
        }),
        None => Err(Error::LocationParse {
            cep: cep.to_string(),
            message: format!("'{CITY_FIELD}' is missing"),
        }),
    }
}

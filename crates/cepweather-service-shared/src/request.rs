//! Request types and validation for HTTP endpoints.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use cepweather_lib::PostalCode;

use crate::ServiceError;

/// Validation trait for request types.
///
/// Validation turns the raw wire type into the domain type the handler works
/// with, or into the `ServiceError` to send back.
pub trait Validate {
    /// The validated value.
    type Output;

    /// Validate the request, returning an error if invalid.
    fn validate(&self) -> Result<Self::Output, ServiceError>;
}

/// Body accepted by both `POST /cep` and `POST /weather`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostalCodeRequest {
    /// Postal code, expected to be exactly eight digits.
    ///
    /// A missing or `null` field decodes as empty and is rejected by
    /// validation rather than by parsing.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cep: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Validate for PostalCodeRequest {
    type Output = PostalCode;

    fn validate(&self) -> Result<PostalCode, ServiceError> {
        PostalCode::parse(&self.cep).map_err(|_| ServiceError::InvalidPostalCode)
    }
}

/// Decode a JSON request body, mapping any failure to `MalformedInput`.
///
/// Handlers take the raw body instead of axum's `Json` extractor so that
/// decode failures produce the 422 `invalid input` response rather than the
/// extractor's own rejection.
pub fn parse_json_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ServiceError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "failed to decode request body");
        ServiceError::MalformedInput
    })
}

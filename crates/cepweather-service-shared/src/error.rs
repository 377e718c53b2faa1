//! HTTP-facing error taxonomy.
//!
//! Every failure a handler can report maps to a fixed status code and a short
//! plain-text message. There is no structured error body.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use cepweather_lib::Error as LibError;

/// Body for unparseable request JSON.
pub const MSG_INVALID_INPUT: &str = "invalid input";

/// Body for a `cep` that is not exactly eight digits.
pub const MSG_INVALID_ZIPCODE: &str = "invalid zipcode";

/// Body when the postal code cannot be resolved to a city.
pub const MSG_ZIPCODE_NOT_FOUND: &str = "can not find zipcode";

/// Body when the temperature lookup fails.
pub const MSG_TEMPERATURE_FAILED: &str = "error fetching temperature";

/// Body when the weather service cannot be reached.
pub const MSG_INTERNAL_ERROR: &str = "internal error";

/// Body when the weather service answers 200 with an undecodable payload.
pub const MSG_INVALID_UPSTREAM_RESPONSE: &str = "invalid weather response";

const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";

/// Terminal request failure, rendered as `status` + plain-text message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceError {
    /// Request body is not valid JSON for the expected shape.
    MalformedInput,

    /// `cep` does not match the 8-digit rule.
    InvalidPostalCode,

    /// Location lookup failed or reported the code as unknown.
    ZipcodeNotFound,

    /// Weather lookup failed or returned an unexpected shape.
    TemperatureUnavailable,

    /// Weather service could not be reached.
    UpstreamUnreachable,

    /// Weather service answered 200 but the body was not a weather report.
    UpstreamDecodeError,

    /// Weather service answered with a non-200 status; relayed as-is with the
    /// status's reason phrase as body.
    UpstreamStatus(StatusCode),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedInput | Self::InvalidPostalCode => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ZipcodeNotFound => StatusCode::NOT_FOUND,
            Self::TemperatureUnavailable
            | Self::UpstreamUnreachable
            | Self::UpstreamDecodeError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UpstreamStatus(status) => *status,
        }
    }

    /// Plain-text body sent to the caller.
    pub fn message(&self) -> &'static str {
        match self {
            Self::MalformedInput => MSG_INVALID_INPUT,
            Self::InvalidPostalCode => MSG_INVALID_ZIPCODE,
            Self::ZipcodeNotFound => MSG_ZIPCODE_NOT_FOUND,
            Self::TemperatureUnavailable => MSG_TEMPERATURE_FAILED,
            Self::UpstreamUnreachable => MSG_INTERNAL_ERROR,
            Self::UpstreamDecodeError => MSG_INVALID_UPSTREAM_RESPONSE,
            Self::UpstreamStatus(status) => status.canonical_reason().unwrap_or("Unknown Status"),
        }
    }

    /// Short label used for the failure-reason metric.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MalformedInput => "malformed_input",
            Self::InvalidPostalCode => "invalid_zipcode",
            Self::ZipcodeNotFound => "zipcode_not_found",
            Self::TemperatureUnavailable => "temperature_unavailable",
            Self::UpstreamUnreachable => "upstream_unreachable",
            Self::UpstreamDecodeError => "upstream_decode_error",
            Self::UpstreamStatus(_) => "upstream_status",
        }
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ServiceError {}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let mut response = (self.status(), self.message()).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(TEXT_PLAIN_UTF8),
        );
        response
    }
}

/// Convert library errors to service errors.
///
/// Location failures collapse to 404, weather failures to 500, and anything
/// else to the generic 500 for the hop that produced it.
pub fn from_lib_error(error: &LibError) -> ServiceError {
    match error {
        LibError::InvalidPostalCode { .. } => ServiceError::InvalidPostalCode,
        LibError::LocationLookupFailed { .. } | LibError::LocationParse { .. } => {
            ServiceError::ZipcodeNotFound
        }
        LibError::WeatherLookupFailed { .. } | LibError::WeatherParse { .. } => {
            ServiceError::TemperatureUnavailable
        }
        LibError::UpstreamDecode { .. } => ServiceError::UpstreamDecodeError,
        LibError::UpstreamUnreachable { .. }
        | LibError::InvalidBaseUrl { .. }
        | LibError::Http(_) => ServiceError::UpstreamUnreachable,
    }
}

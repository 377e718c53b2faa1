use reqwest::StatusCode;
use thiserror::Error;

/// Convenient result alias for the cepweather library.
pub type Result<T> = std::result::Result<T, Error>;

/// Why an outbound lookup did not produce a usable response.
#[derive(Debug, Error)]
pub enum LookupFailure {
    /// The request never completed (DNS, connect, timeout, ...).
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The collaborator answered with a non-success status.
    #[error("unexpected status {0}")]
    Status(StatusCode),

    /// The collaborator explicitly reported that the postal code is unknown.
    #[error("postal code not found")]
    NotFound,
}

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a value does not match the 8-digit CEP format.
    #[error("invalid postal code: {value:?}")]
    InvalidPostalCode { value: String },

    /// Raised when the location lookup could not resolve a postal code.
    #[error("location lookup for {cep} failed: {failure}")]
    LocationLookupFailed {
        cep: String,
        #[source]
        failure: LookupFailure,
    },

    /// Raised when the location lookup answered without a usable city name.
    #[error("failed to parse location for {cep}: {message}")]
    LocationParse { cep: String, message: String },

    /// Raised when the weather lookup could not be completed.
    #[error("weather lookup for {city} failed: {failure}")]
    WeatherLookupFailed {
        city: String,
        #[source]
        failure: LookupFailure,
    },

    /// Raised when the weather lookup body does not have the expected shape.
    #[error("failed to parse weather for {city}: {message}")]
    WeatherParse { city: String, message: String },

    /// Raised when the weather service could not be reached at all.
    #[error("weather service at {url} is unreachable: {source}")]
    UpstreamUnreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Raised when the weather service answered 200 with an undecodable body.
    #[error("failed to decode weather service response: {message}")]
    UpstreamDecode { message: String },

    /// Raised when a configured base URL cannot be parsed.
    #[error("invalid base url {url:?}: {message}")]
    InvalidBaseUrl { url: String, message: String },

    /// Wrapper for HTTP client construction errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// True for failures that happened while resolving the postal code to a city.
    pub fn is_location_failure(&self) -> bool {
        matches!(
            self,
            Error::LocationLookupFailed { .. } | Error::LocationParse { .. }
        )
    }

    /// True for failures that happened while resolving the city temperature.
    pub fn is_weather_failure(&self) -> bool {
        matches!(
            self,
            Error::WeatherLookupFailed { .. } | Error::WeatherParse { .. }
        )
    }
}

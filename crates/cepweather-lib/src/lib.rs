//! cepweather library entry points.
//!
//! This crate validates Brazilian postal codes (CEP), resolves them to a city
//! through ViaCEP, looks up the city's current temperature through WeatherAPI,
//! and converts it to Fahrenheit and Kelvin. The HTTP services only depend on
//! the functions exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod cep;
pub mod error;
pub mod http;
pub mod location;
pub mod relay;
pub mod report;
pub mod temperature;
pub mod weather;

pub use cep::{is_valid_cep, PostalCode};
pub use error::{Error, LookupFailure, Result};
pub use http::{build_http_client, DEFAULT_TIMEOUT};
pub use location::{LocationClient, DEFAULT_VIACEP_BASE_URL};
pub use relay::{RelayReply, WeatherServiceClient, REQUEST_ID_HEADER};
pub use report::WeatherReport;
pub use temperature::{celsius_to_fahrenheit, celsius_to_kelvin};
pub use weather::{WeatherClient, DEFAULT_WEATHERAPI_BASE_URL};

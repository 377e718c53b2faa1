//! The weather report returned to clients.

use serde::{Deserialize, Serialize};

use crate::temperature::{celsius_to_fahrenheit, celsius_to_kelvin};

/// Current temperature of a city in Celsius, Fahrenheit and Kelvin.
///
/// Only `city` and Celsius are stored inputs. Fahrenheit and Kelvin are
/// computed in [`WeatherReport::new`], and deserialization goes through the
/// same constructor, so a payload carrying inconsistent `temp_F`/`temp_K`
/// values is normalized rather than trusted.
///
/// Wire shape:
///
/// ```json
/// {"city":"São Paulo","temp_C":25.0,"temp_F":77.0,"temp_K":298.15}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ReportWire")]
pub struct WeatherReport {
    city: String,
    #[serde(rename = "temp_C")]
    temp_c: f64,
    #[serde(rename = "temp_F")]
    temp_f: f64,
    #[serde(rename = "temp_K")]
    temp_k: f64,
}

impl WeatherReport {
    pub fn new(city: impl Into<String>, celsius: f64) -> Self {
        Self {
            city: city.into(),
            temp_c: celsius,
            temp_f: celsius_to_fahrenheit(celsius),
            temp_k: celsius_to_kelvin(celsius),
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn celsius(&self) -> f64 {
        self.temp_c
    }

    pub fn fahrenheit(&self) -> f64 {
        self.temp_f
    }

    pub fn kelvin(&self) -> f64 {
        self.temp_k
    }
}

/// Incoming shape. `temp_F` and `temp_K` fall through as unknown fields.
#[derive(Deserialize)]
struct ReportWire {
    city: String,
    #[serde(rename = "temp_C")]
    temp_c: f64,
}

impl From<ReportWire> for WeatherReport {
    fn from(wire: ReportWire) -> Self {
        WeatherReport::new(wire.city, wire.temp_c)
    }
}

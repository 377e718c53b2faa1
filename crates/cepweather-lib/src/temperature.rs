//! Temperature unit conversion.
//!
//! Celsius is the only measured value; Fahrenheit and Kelvin are always
//! derived from it with the formulas below.

/// Conversion constants.
pub mod constants {
    /// Fahrenheit degrees per Celsius degree.
    pub const FAHRENHEIT_SCALE: f64 = 1.8;

    /// Fahrenheit reading at 0 °C.
    pub const FAHRENHEIT_OFFSET: f64 = 32.0;

    /// Kelvin reading at 0 °C.
    pub const KELVIN_OFFSET: f64 = 273.15;
}

/// Convert Celsius to Fahrenheit (`c * 1.8 + 32`).
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * constants::FAHRENHEIT_SCALE + constants::FAHRENHEIT_OFFSET
}

/// Convert Celsius to Kelvin (`c + 273.15`).
pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + constants::KELVIN_OFFSET
}

//! Postal code (CEP) validation.
//!
//! A CEP is valid when it is exactly eight ASCII decimal digits. Everything
//! downstream of the HTTP boundary takes a [`PostalCode`], which can only be
//! built through [`PostalCode::parse`].

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::{Error, Result};

/// Compiled once; `[0-9]` keeps non-ASCII Unicode digits out.
static CEP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{8}$").expect("CEP pattern is a valid regex"));

/// Returns true when `value` is exactly eight ASCII digits.
pub fn is_valid_cep(value: &str) -> bool {
    CEP_PATTERN.is_match(value)
}

/// A validated 8-digit postal code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PostalCode(String);

impl PostalCode {
    /// Validate `value` and wrap it.
    pub fn parse(value: &str) -> Result<Self> {
        if is_valid_cep(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(Error::InvalidPostalCode {
                value: value.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PostalCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

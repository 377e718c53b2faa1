//! Environment-based configuration shared by both services.
//!
//! # Environment Variables
//!
//! - `SERVICE_PORT`: HTTP port (default depends on the service)
//! - `UPSTREAM_TIMEOUT_SECS`: timeout for every outbound call (default: 10)
//! - `ZIPKIN_ENDPOINT`: span collector address (optional, recorded at startup)
//!
//! Service-specific variables are read by each service's own config type
//! through the same [`EnvLookup`] so tests can supply values without touching
//! the process environment.

use std::time::Duration;

use thiserror::Error;

use cepweather_lib::DEFAULT_TIMEOUT;

/// Source of configuration values, keyed by variable name.
pub trait EnvLookup {
    fn get(&self, name: &str) -> Option<String>;
}

/// Reads from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl<F> EnvLookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// Errors raised while reading configuration at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {name} is not set")]
    MissingVar { name: &'static str },

    #[error("environment variable {name} has invalid value {value:?}: {message}")]
    InvalidVar {
        name: &'static str,
        value: String,
        message: String,
    },

    /// A configured URL or the HTTP client itself was rejected.
    #[error(transparent)]
    Client(#[from] cepweather_lib::Error),
}

/// Read a variable, treating an empty or whitespace-only value as unset.
pub fn optional_var(env: &impl EnvLookup, name: &str) -> Option<String> {
    env.get(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read a variable that must be present.
pub fn required_var(env: &impl EnvLookup, name: &'static str) -> Result<String, ConfigError> {
    optional_var(env, name).ok_or(ConfigError::MissingVar { name })
}

/// Settings every service reads.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonConfig {
    /// Port to listen on.
    pub port: u16,
    /// Timeout applied to every outbound call.
    pub upstream_timeout: Duration,
    /// Span collector address, if one is deployed.
    pub zipkin_endpoint: Option<String>,
}

impl CommonConfig {
    pub fn from_env(default_port: u16) -> Result<Self, ConfigError> {
        Self::from_lookup(default_port, &ProcessEnv)
    }

    pub fn from_lookup(default_port: u16, env: &impl EnvLookup) -> Result<Self, ConfigError> {
        let port = match optional_var(env, "SERVICE_PORT") {
            Some(value) => value.parse::<u16>().map_err(|e| ConfigError::InvalidVar {
                name: "SERVICE_PORT",
                value: value.clone(),
                message: e.to_string(),
            })?,
            None => default_port,
        };

        let upstream_timeout = match optional_var(env, "UPSTREAM_TIMEOUT_SECS") {
            Some(value) => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                Ok(_) => {
                    return Err(ConfigError::InvalidVar {
                        name: "UPSTREAM_TIMEOUT_SECS",
                        value,
                        message: "must be at least 1".to_string(),
                    })
                }
                Err(e) => {
                    return Err(ConfigError::InvalidVar {
                        name: "UPSTREAM_TIMEOUT_SECS",
                        value: value.clone(),
                        message: e.to_string(),
                    })
                }
            },
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            port,
            upstream_timeout,
            zipkin_endpoint: optional_var(env, "ZIPKIN_ENDPOINT"),
        })
    }
}

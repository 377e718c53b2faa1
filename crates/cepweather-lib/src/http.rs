//! Outbound HTTP client construction shared by every collaborator client.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::{Error, Result};

/// Default per-request timeout for outbound calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("cepweather/", env!("CARGO_PKG_VERSION"));

/// Build the long-lived client a service shares across all requests.
///
/// `reqwest::Client` pools connections internally and is cheap to clone, so
/// each service builds one at startup and hands clones to its lookup clients.
pub fn build_http_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Validate a base URL and strip any trailing slash so paths can be appended.
pub(crate) fn normalize_base_url(url: &str) -> Result<String> {
    validate_url(url)?;
    Ok(url.trim_end_matches('/').to_string())
}

/// Check that `url` parses and uses http or https. The URL is used as given.
pub(crate) fn validate_url(url: &str) -> Result<()> {
    let parsed = Url::parse(url).map_err(|e| Error::InvalidBaseUrl {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::InvalidBaseUrl {
            url: url.to_string(),
            message: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_client_with_timeout() {
        assert!(build_http_client(Duration::from_secs(1)).is_ok());
    }

    #[test]
    fn trailing_slash_is_removed() {
        assert_eq!(
            normalize_base_url("https://viacep.com.br/").unwrap(),
            "https://viacep.com.br"
        );
        assert_eq!(
            normalize_base_url("http://127.0.0.1:8082/weather").unwrap(),
            "http://127.0.0.1:8082/weather"
        );
    }

    #[test]
    fn validate_url_does_not_rewrite() {
        assert!(validate_url("http://127.0.0.1:8082/weather/").is_ok());
        assert!(validate_url("ftp://example.com").is_err());
    }

    #[test]
    fn rejects_unparseable_and_non_http_urls() {
        assert!(matches!(
            normalize_base_url("not a url"),
            Err(Error::InvalidBaseUrl { .. })
        ));
        let err = normalize_base_url("ftp://example.com").unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }
}

//! Shared HTTP fetch boundary
//!
//! Every upstream call goes through [`HttpFetcher::get_json`], which turns
//! transport, status and decoding failures into [`FetchError`].

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Error types for upstream fetch operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("Network failure: {0}")]
    NetworkFailure(String),
    #[error("HTTP status error: {status} - {body}")]
    HttpStatus { status: u16, body: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Empty result: {0}")]
    EmptyResult(String),
}

/// Thin reqwest wrapper used by the market and news clients
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl HttpFetcher {
    /// Create a fetcher; `None` leaves requests without a deadline
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    /// Issue a GET and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        debug!("GET {} {:?}", url, redact(query));

        let mut request = self.client.get(url).query(query);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::NetworkFailure(format!("{}: {}", url, e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!("GET {} returned HTTP {}", url, status);
            return Err(FetchError::HttpStatus { status, body });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::Parse(format!("{}: {}", url, e)))
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(None)
    }
}

// Credentials must never reach the log file.
fn redact<'a>(query: &'a [(&'a str, String)]) -> Vec<(&'a str, &'a str)> {
    query
        .iter()
        .map(|(key, value)| {
            if key.contains("key") {
                (*key, "***")
            } else {
                (*key, value.as_str())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_hides_api_key() {
        let query = vec![("lang", "EN".to_string()), ("api_key", "secret".to_string())];
        let redacted = redact(&query);
        assert_eq!(redacted, vec![("lang", "EN"), ("api_key", "***")]);
    }

    #[test]
    fn test_error_display() {
        let err = FetchError::HttpStatus {
            status: 429,
            body: "rate limited".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP status error: 429 - rate limited");
    }
}

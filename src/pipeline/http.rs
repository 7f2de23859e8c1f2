//! Shared HTTP plumbing for the two backend endpoints.
//!
//! ## Error-message policy
//!
//! The backend reports failures as `{ "error": "..." }` with a non-2xx
//! status. When that field is present it is the whole user-facing message;
//! otherwise the transport-level description is used (connection refused,
//! `request failed with status code 502`, ...). Exactly one of the two is
//! shown, never a concatenation.

use crate::config::AnalyzerConfig;
use crate::error::{DocAnalyzerError, Endpoint};
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// HTTP client bound to one backend.
#[derive(Debug, Clone)]
pub struct BackendClient {
    pub(crate) http: reqwest::Client,
    pub(crate) upload_url: Url,
    pub(crate) analyze_url: Url,
    pub(crate) upload_timeout: Duration,
    pub(crate) analyze_timeout: Duration,
}

impl BackendClient {
    /// Build a client, validating `config` first.
    pub fn new(config: &AnalyzerConfig) -> Result<Self, DocAnalyzerError> {
        config.validate()?;
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder
            .build()
            .map_err(|e| DocAnalyzerError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            upload_url: config.upload_url()?,
            analyze_url: config.analyze_url()?,
            upload_timeout: config.upload_timeout(),
            analyze_timeout: config.analyze_timeout(),
        })
    }

    pub fn upload_url(&self) -> &Url {
        &self.upload_url
    }

    pub fn analyze_url(&self) -> &Url {
        &self.analyze_url
    }

    pub(crate) fn timeout_for(&self, endpoint: Endpoint) -> Duration {
        match endpoint {
            Endpoint::Upload => self.upload_timeout,
            Endpoint::Analyze => self.analyze_timeout,
        }
    }
}

/// Map a `reqwest` send/receive error to the library error for `endpoint`.
pub(crate) fn transport_error(
    endpoint: Endpoint,
    err: reqwest::Error,
    timeout: Duration,
) -> DocAnalyzerError {
    if err.is_timeout() {
        DocAnalyzerError::Timeout {
            endpoint,
            secs: timeout.as_secs(),
        }
    } else {
        DocAnalyzerError::request_failed(endpoint, err.to_string(), None)
    }
}

/// The server's `error` field, if the body is JSON and carries a non-empty one.
pub fn server_error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match value.get("error")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::String(_) | Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Read a response: non-2xx becomes a request-failed error, 2xx bodies are
/// parsed as `T`.
pub(crate) async fn read_json<T: DeserializeOwned>(
    endpoint: Endpoint,
    response: Response,
    timeout: Duration,
) -> Result<T, DocAnalyzerError> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| transport_error(endpoint, e, timeout))?;
    debug!("{} response: HTTP {} ({} bytes)", endpoint, status, body.len());

    if !status.is_success() {
        let message = server_error_message(&body)
            .unwrap_or_else(|| format!("request failed with status code {}", status.as_u16()));
        return Err(DocAnalyzerError::request_failed(
            endpoint,
            message,
            Some(status.as_u16()),
        ));
    }

    serde_json::from_slice(&body).map_err(|e| DocAnalyzerError::MalformedResponse {
        endpoint,
        detail: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_from_error_field() {
        assert_eq!(
            server_error_message(br#"{"error":"disk full"}"#),
            Some("disk full".to_string())
        );
    }

    #[test]
    fn server_message_absent_or_blank() {
        assert_eq!(server_error_message(br#"{"detail":"x"}"#), None);
        assert_eq!(server_error_message(br#"{"error":"  "}"#), None);
        assert_eq!(server_error_message(br#"{"error":null}"#), None);
        assert_eq!(server_error_message(b"<html>Bad Gateway</html>"), None);
        assert_eq!(server_error_message(b""), None);
    }

    #[test]
    fn server_message_non_string_is_serialised() {
        assert_eq!(
            server_error_message(br#"{"error":{"code":7}}"#),
            Some(r#"{"code":7}"#.to_string())
        );
    }

    #[test]
    fn client_urls_follow_config() {
        let config = AnalyzerConfig::builder()
            .base_url("http://127.0.0.1:9")
            .upload_timeout_secs(5)
            .build()
            .unwrap();
        let client = BackendClient::new(&config).unwrap();
        assert_eq!(client.upload_url().as_str(), "http://127.0.0.1:9/api/upload");
        assert_eq!(client.analyze_url().path(), "/api/analyze");
        assert_eq!(client.timeout_for(Endpoint::Upload), Duration::from_secs(5));
    }

    #[test]
    fn client_rejects_unvalidated_zero_timeout() {
        let config = AnalyzerConfig {
            analyze_timeout_secs: 0,
            ..AnalyzerConfig::default()
        };
        let err = BackendClient::new(&config).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidConfig);
    }
}

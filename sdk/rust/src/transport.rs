//! The send primitive the client dispatches through.
//!
//! [`Transport`] is the seam between query dispatch and the network.
//! [`HttpTransport`] is the production implementation: a JSON POST of
//! `{"query": ...}` to the configured URL.

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::error::{SdkError, SdkResult, TransportError};

/// Request headers, in the order they were set.
pub type Headers = IndexMap<String, String>;

/// One query ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub url: String,
    pub query: String,
    pub headers: Headers,
}

/// A top-level GraphQL error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

/// A decoded GraphQL response body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphqlPayload {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<GraphqlError>>,
}

impl GraphqlPayload {
    /// A successful payload carrying `data`.
    pub fn data(data: Value) -> Self {
        Self {
            data: Some(data),
            errors: None,
        }
    }

    /// A payload with neither data nor errors.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the first reported error, if any.
    pub fn first_error(&self) -> Option<&GraphqlError> {
        self.errors.as_ref().and_then(|errors| errors.first())
    }
}

/// Sends one query and returns the decoded body.
///
/// Implementations report non-success HTTP statuses as a [`TransportError`]
/// carrying the status, so exception handlers can match on it.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &TransportRequest) -> Result<GraphqlPayload, TransportError>;
}

/// HTTP transport built on `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport with the given request timeout.
    pub fn new(timeout: Duration) -> SdkResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SdkError::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { http })
    }

    /// Wraps an existing `reqwest` client.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &TransportRequest) -> Result<GraphqlPayload, TransportError> {
        let mut builder = self
            .http
            .post(&request.url)
            .json(&serde_json::json!({ "query": request.query }));
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = error_message(&bytes)
                .unwrap_or_else(|| format!("HTTP {status}: {}", truncate_body(&bytes)));
            return Err(TransportError::http(status.as_u16(), message));
        }

        // A literal `null` body is a nullish response, not a decoding failure.
        let payload: Option<GraphqlPayload> = serde_json::from_slice(&bytes).map_err(|e| {
            TransportError::invalid_response(format!(
                "Failed to parse response: {e}. Body: {}",
                truncate_body(&bytes)
            ))
        })?;
        Ok(payload.unwrap_or_default())
    }
}

/// Extracts the first GraphQL error message of an error body.
fn error_message(bytes: &[u8]) -> Option<String> {
    let payload: GraphqlPayload = serde_json::from_slice(bytes).ok()?;
    payload.first_error().map(|e| e.message.clone())
}

fn truncate_body(bytes: &[u8]) -> String {
    const MAX_LEN: usize = 200;
    let body = String::from_utf8_lossy(bytes);
    match body.char_indices().nth(MAX_LEN) {
        Some((cut, _)) => format!("{}…", &body[..cut]),
        None => body.into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_decoding() {
        let payload: GraphqlPayload = serde_json::from_value(json!({
            "data": null,
            "errors": [{ "message": "Cannot query field \"nme\"", "path": ["selectOne"] }]
        }))
        .unwrap();

        assert_eq!(payload.data, None);
        assert_eq!(
            payload.first_error().map(|e| e.message.as_str()),
            Some("Cannot query field \"nme\"")
        );
    }

    #[test]
    fn test_payload_without_errors() {
        let payload: GraphqlPayload =
            serde_json::from_value(json!({ "data": { "selectOne": null } })).unwrap();
        assert!(payload.first_error().is_none());
        assert!(payload.data.is_some());
    }

    #[test]
    fn test_error_message_from_body() {
        let body = br#"{"errors":[{"message":"token expired"}]}"#;
        assert_eq!(error_message(body), Some("token expired".to_string()));
        assert_eq!(error_message(b"<html>Bad Gateway</html>"), None);
    }

    #[test]
    fn test_truncate_body() {
        let long = "x".repeat(500);
        let truncated = truncate_body(long.as_bytes());
        assert_eq!(truncated.chars().count(), 201);
        assert!(truncated.ends_with('…'));
        assert_eq!(truncate_body(b"short"), "short");
    }
}

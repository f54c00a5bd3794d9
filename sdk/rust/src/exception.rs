//! Pluggable HTTP exception handlers.
//!
//! When a send fails with an HTTP status, the client consults the first
//! registered handler that declares that status. The handler decides whether
//! the request is sent once more, and may rewrite the headers of that retry.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::transport::Headers;

/// Request state a handler may rewrite before the retry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hooks {
    pub headers: Headers,
}

impl Hooks {
    pub fn new(headers: Headers) -> Self {
        Self { headers }
    }

    /// Sets a header on the retried request.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }
}

/// A handler's verdict on one failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleOutcome {
    pub must_retry: bool,
    pub error: TransportError,
    pub hooks: Hooks,
}

impl HandleOutcome {
    /// Sends the request again with `hooks`.
    pub fn retry(error: TransportError, hooks: Hooks) -> Self {
        Self {
            must_retry: true,
            error,
            hooks,
        }
    }

    /// Lets the failure stand.
    pub fn give_up(error: TransportError, hooks: Hooks) -> Self {
        Self {
            must_retry: false,
            error,
            hooks,
        }
    }
}

/// Retry policy for a set of HTTP statuses.
#[async_trait]
pub trait HttpExceptionHandler: Send + Sync {
    /// Statuses this handler is consulted for.
    fn handled_http_statuses(&self) -> &[u16];

    async fn handle(&self, error: TransportError, hooks: Hooks) -> HandleOutcome;

    fn handles(&self, status: u16) -> bool {
        self.handled_http_statuses().contains(&status)
    }
}

/// Retries any of a fixed list of statuses, leaving the request untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryOnStatus {
    statuses: Vec<u16>,
}

impl RetryOnStatus {
    pub fn new(statuses: impl IntoIterator<Item = u16>) -> Self {
        Self {
            statuses: statuses.into_iter().collect(),
        }
    }
}

#[async_trait]
impl HttpExceptionHandler for RetryOnStatus {
    fn handled_http_statuses(&self) -> &[u16] {
        &self.statuses
    }

    async fn handle(&self, error: TransportError, hooks: Hooks) -> HandleOutcome {
        HandleOutcome::retry(error, hooks)
    }
}

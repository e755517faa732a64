//! Backend transport abstraction
//!
//! One request, one response. No retries, no streaming.

mod error;
mod http;
mod types;

#[cfg(test)]
pub mod testing;

pub use error::{TransportError, TransportErrorKind, FALLBACK_ERROR_MESSAGE};
pub use http::HttpTransport;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Every conversation request gets the same deadline
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Common interface for reaching the conversation endpoints
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and wait for the reply or the deadline
    async fn send(
        &self,
        request: &BackendRequest,
        timeout: Duration,
    ) -> Result<BackendReply, TransportError>;

    /// Base URL every endpoint is resolved against
    fn base_url(&self) -> &str;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(
        &self,
        request: &BackendRequest,
        timeout: Duration,
    ) -> Result<BackendReply, TransportError> {
        (**self).send(request, timeout).await
    }

    fn base_url(&self) -> &str {
        (**self).base_url()
    }
}

/// Logging wrapper for transports
pub struct LoggingTransport<T> {
    inner: T,
}

impl<T: Transport> LoggingTransport<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: Transport> Transport for LoggingTransport<T> {
    async fn send(
        &self,
        request: &BackendRequest,
        timeout: Duration,
    ) -> Result<BackendReply, TransportError> {
        let start = std::time::Instant::now();
        let result = self.inner.send(request, timeout).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    endpoint = request.endpoint(),
                    duration_ms = %duration.as_millis(),
                    response_chars = reply.text().chars().count(),
                    "Backend request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    endpoint = request.endpoint(),
                    duration_ms = %duration.as_millis(),
                    kind = e.kind.as_str(),
                    status = ?e.status,
                    error = %e.message,
                    "Backend request failed"
                );
            }
        }

        result
    }

    fn base_url(&self) -> &str {
        self.inner.base_url()
    }
}

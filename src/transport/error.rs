//! Transport error types

use std::time::Duration;
use thiserror::Error;

/// Shown when a failure carries no usable description at all
pub const FALLBACK_ERROR_MESSAGE: &str =
    "Failed to get response. Make sure the backend is running.";

/// Transport error with classification
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
    /// HTTP status, when the backend answered at all
    pub status: Option<u16>,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Network, message)
    }

    pub fn timeout(after: Duration) -> Self {
        Self::new(
            TransportErrorKind::Timeout,
            format!("Request timed out after {}s", after.as_secs()),
        )
    }

    /// The backend explained itself with an `{error}` body
    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Backend, message)
    }

    /// Non-2xx status without a body we could make sense of
    pub fn status(status: u16) -> Self {
        Self::new(
            TransportErrorKind::Status,
            format!("Request failed with status code {status}"),
        )
        .with_status(status)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Unknown, message)
    }

    /// Text for the dismissable error banner.
    ///
    /// Backend-provided text wins, then the transport description, then a
    /// fixed fallback when both are blank.
    pub fn display_message(&self) -> String {
        let trimmed = self.message.trim();
        if trimmed.is_empty() {
            FALLBACK_ERROR_MESSAGE.to_string()
        } else {
            trimmed.to_string()
        }
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection refused, DNS failure, reset mid-body
    Network,
    /// The request outlived its deadline
    Timeout,
    /// Structured `{error}` body, or a 2xx body missing `response`
    Backend,
    /// Non-2xx status with no parseable body
    Status,
    /// Anything else
    Unknown,
}

impl TransportErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Backend => "backend",
            Self::Status => "status",
            Self::Unknown => "unknown",
        }
    }
}

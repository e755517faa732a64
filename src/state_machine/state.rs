//! Session state types

use crate::transport::{BackendRequest, ChatMode, REQUEST_TIMEOUT};
use std::time::Duration;

/// Where a session is in its request lifecycle
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmissionState {
    /// Ready for input, nothing in flight
    #[default]
    Idle,

    /// One request in flight; every other submission is refused
    Awaiting { request: BackendRequest },
}

impl SubmissionState {
    pub fn is_awaiting(&self) -> bool {
        matches!(self, SubmissionState::Awaiting { .. })
    }
}

/// Context for a session (immutable configuration)
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    pub mode: ChatMode,
    pub timeout: Duration,
}

impl SessionContext {
    pub fn new(mode: ChatMode) -> Self {
        Self {
            mode,
            timeout: REQUEST_TIMEOUT,
        }
    }
}

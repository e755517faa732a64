//! Mock transports for testing
//!
//! These mocks let the controller run without a backend.

use super::{BackendReply, BackendRequest, Transport, TransportError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

// ============================================================================
// Mock Transport
// ============================================================================

/// Mock transport that returns queued outcomes in order
pub struct MockTransport {
    outcomes: Mutex<VecDeque<Result<BackendReply, TransportError>>>,
    /// Record of every request sent, with the deadline it was given
    pub requests: Mutex<Vec<(BackendRequest, Duration)>>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, reply: BackendReply) {
        self.outcomes.lock().unwrap().push_back(Ok(reply));
    }

    /// Queue a failure
    pub fn queue_error(&self, error: TransportError) {
        self.outcomes.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<(BackendRequest, Duration)> {
        self.requests.lock().unwrap().clone()
    }

    fn next_outcome(
        &self,
        request: &BackendRequest,
        timeout: Duration,
    ) -> Result<BackendReply, TransportError> {
        self.requests
            .lock()
            .unwrap()
            .push((request.clone(), timeout));
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::network("No mock outcome queued")))
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(
        &self,
        request: &BackendRequest,
        timeout: Duration,
    ) -> Result<BackendReply, TransportError> {
        self.next_outcome(request, timeout)
    }

    fn base_url(&self) -> &str {
        "http://mock.invalid"
    }
}

// ============================================================================
// Gated Mock Transport (for single-flight testing)
// ============================================================================

/// Mock transport that holds every request until the test releases it
pub struct GatedMockTransport {
    inner: MockTransport,
    release: Arc<Notify>,
    /// Notified when a request reaches the transport
    pub request_started: Arc<Notify>,
}

#[allow(dead_code)]
impl GatedMockTransport {
    pub fn new() -> Self {
        Self {
            inner: MockTransport::new(),
            release: Arc::new(Notify::new()),
            request_started: Arc::new(Notify::new()),
        }
    }

    pub fn queue_reply(&self, reply: BackendReply) {
        self.inner.queue_reply(reply);
    }

    pub fn queue_error(&self, error: TransportError) {
        self.inner.queue_error(error);
    }

    /// Let the pending request resolve
    pub fn release(&self) {
        self.release.notify_one();
    }

    pub fn recorded_requests(&self) -> Vec<(BackendRequest, Duration)> {
        self.inner.recorded_requests()
    }
}

#[async_trait]
impl Transport for GatedMockTransport {
    async fn send(
        &self,
        request: &BackendRequest,
        timeout: Duration,
    ) -> Result<BackendReply, TransportError> {
        self.request_started.notify_one();
        self.release.notified().await;
        self.inner.next_outcome(request, timeout)
    }

    fn base_url(&self) -> &str {
        self.inner.base_url()
    }
}

// ============================================================================
// Stalled Mock Transport (for deadline testing)
// ============================================================================

/// Mock transport that never answers and reports a timeout once the
/// deadline passes, the way the HTTP transport does
pub struct StalledMockTransport;

#[async_trait]
impl Transport for StalledMockTransport {
    async fn send(
        &self,
        _request: &BackendRequest,
        timeout: Duration,
    ) -> Result<BackendReply, TransportError> {
        tokio::time::sleep(timeout).await;
        Err(TransportError::timeout(timeout))
    }

    fn base_url(&self) -> &str {
        "http://stalled.invalid"
    }
}

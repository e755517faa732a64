//! Session store
//!
//! Holds the conversation log plus in-flight and error state. Every mutation
//! publishes a fresh immutable snapshot; views subscribe instead of sharing
//! the state.

use super::Message;
use std::sync::Arc;
use tokio::sync::watch;

/// Point-in-time view of one conversation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// Append-only, in submission order
    pub log: Vec<Message>,
    /// Uncommitted text in the input field
    pub pending_input: String,
    /// True exactly while a submission is in flight
    pub is_awaiting_response: bool,
    /// Detail for the dismissable banner
    pub last_error: Option<String>,
}

impl SessionState {
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }
}

/// Single owner of a session's state
#[derive(Debug)]
pub struct SessionStore {
    tx: watch::Sender<Arc<SessionState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(SessionState::default()));
        Self { tx }
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<SessionState> {
        Arc::clone(&self.tx.borrow())
    }

    /// Receive every snapshot published from now on
    pub fn subscribe(&self) -> watch::Receiver<Arc<SessionState>> {
        self.tx.subscribe()
    }

    /// Insert at the end; never reorders or deduplicates
    pub fn append(&self, message: Message) {
        self.publish(|state| state.log.push(message));
    }

    pub fn set_pending(&self, text: impl Into<String>) {
        let text = text.into();
        self.publish(|state| state.pending_input = text);
    }

    pub fn set_awaiting(&self, awaiting: bool) {
        self.publish(|state| state.is_awaiting_response = awaiting);
    }

    pub fn set_error(&self, error: Option<String>) {
        self.publish(|state| state.last_error = error);
    }

    fn publish(&self, mutate: impl FnOnce(&mut SessionState)) {
        self.tx.send_modify(|current| {
            let mut next = SessionState::clone(current);
            mutate(&mut next);
            *current = Arc::new(next);
        });
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

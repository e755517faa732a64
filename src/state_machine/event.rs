//! Events that can occur in a session

use crate::transport::{BackendReply, TransportError};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    /// Typed text or a picked suggestion, untrimmed
    Submit { text: String },

    // Backend events
    BackendReplied { reply: BackendReply },
    BackendFailed { error: TransportError },
}

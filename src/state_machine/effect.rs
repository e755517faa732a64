//! Effects produced by state transitions

use crate::session::Message;
use crate::transport::BackendRequest;
use std::time::Duration;

/// Effects to be executed against the session after a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Append to the log
    AppendMessage(Message),

    /// Flip the in-flight flag the view renders
    SetAwaiting(bool),

    /// Replace or clear the banner text
    SetError(Option<String>),

    /// Empty the input field
    ClearPending,

    /// Issue the backend request
    RequestBackend {
        request: BackendRequest,
        timeout: Duration,
    },
}

impl Effect {
    pub fn append_user_message(text: impl Into<String>) -> Self {
        Effect::AppendMessage(Message::user(text))
    }

    pub fn clear_error() -> Self {
        Effect::SetError(None)
    }

    pub fn show_error(message: impl Into<String>) -> Self {
        Effect::SetError(Some(message.into()))
    }
}

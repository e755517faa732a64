//! Pure state transition function

use super::{Effect, Event, SessionContext, SubmissionState};
use crate::session::Message;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SubmissionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SubmissionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Transitions the session refuses. The first two are silent no-ops for
/// the user; the last one is a bug in whoever fed the event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Nothing to submit")]
    EmptyInput,
    #[error("A request is already in flight")]
    Busy,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs, with no I/O.
pub fn transition(
    state: &SubmissionState,
    context: &SessionContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // Submission
        // ============================================================
        (_, Event::Submit { text }) if text.trim().is_empty() => Err(TransitionError::EmptyInput),

        (SubmissionState::Awaiting { .. }, Event::Submit { .. }) => Err(TransitionError::Busy),

        // The user entry is logged before the request effect runs
        (SubmissionState::Idle, Event::Submit { text }) => {
            let text = text.trim();
            let request = context.mode.request(text);
            Ok(
                TransitionResult::new(SubmissionState::Awaiting {
                    request: request.clone(),
                })
                .with_effect(Effect::clear_error())
                .with_effect(Effect::SetAwaiting(true))
                .with_effect(Effect::append_user_message(text))
                .with_effect(Effect::RequestBackend {
                    request,
                    timeout: context.timeout,
                }),
            )
        }

        // ============================================================
        // Resolution
        // ============================================================
        (SubmissionState::Awaiting { .. }, Event::BackendReplied { reply }) => {
            Ok(TransitionResult::new(SubmissionState::Idle)
                .with_effect(Effect::AppendMessage(Message::from_reply(reply)))
                .with_effect(Effect::SetAwaiting(false))
                .with_effect(Effect::ClearPending))
        }

        // Detail goes to the banner, the log only gets the apology
        (SubmissionState::Awaiting { .. }, Event::BackendFailed { error }) => {
            Ok(TransitionResult::new(SubmissionState::Idle)
                .with_effect(Effect::show_error(error.display_message()))
                .with_effect(Effect::AppendMessage(Message::apology(context.mode)))
                .with_effect(Effect::SetAwaiting(false))
                .with_effect(Effect::ClearPending))
        }

        (
            SubmissionState::Idle,
            event @ (Event::BackendReplied { .. } | Event::BackendFailed { .. }),
        ) => Err(TransitionError::InvalidTransition(format!(
            "{event:?} with no request in flight"
        ))),
    }
}

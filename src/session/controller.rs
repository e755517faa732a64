//! Query submission controller
//!
//! Drives one submission at a time through the state machine and applies
//! the resulting effects to the session store.

use super::SessionStore;
use crate::state_machine::{
    transition, Effect, Event, SessionContext, SubmissionState, TransitionError, TransitionResult,
};
use crate::suggestions;
use crate::transport::{ChatMode, Transport, TransportError};
use std::sync::{Mutex, PoisonError};

/// How a call to `submit` ended
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Assistant entry appended
    Answered,
    /// Error entry appended and banner set
    Failed(TransportError),
    /// Nothing happened: blank input or a request already in flight
    Skipped(TransitionError),
}

/// Owns one session's single-flight state and its store
pub struct SessionController<T: Transport> {
    context: SessionContext,
    state: Mutex<SubmissionState>,
    store: SessionStore,
    transport: T,
}

impl<T: Transport> SessionController<T> {
    pub fn new(context: SessionContext, transport: T) -> Self {
        Self {
            context,
            state: Mutex::new(SubmissionState::Idle),
            store: SessionStore::new(),
            transport,
        }
    }

    pub fn mode(&self) -> ChatMode {
        self.context.mode
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// True while a submission holds the single-flight slot
    pub fn is_awaiting(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_awaiting()
    }

    /// Mirror the input field
    pub fn set_pending(&self, text: impl Into<String>) {
        self.store.set_pending(text);
    }

    /// Hide the error banner; the log keeps its error entry
    pub fn dismiss_error(&self) {
        self.store.set_error(None);
    }

    /// Submit whatever is in the input field
    pub async fn submit_pending(&self) -> SubmitOutcome {
        let text = self.store.snapshot().pending_input.clone();
        self.submit(&text).await
    }

    /// Mirror `text` into the input field and submit that same text.
    ///
    /// The field is left alone while another submission is in flight, and
    /// the submitted text never depends on what the field holds by the time
    /// the request starts.
    pub async fn submit_typed(&self, text: &str) -> SubmitOutcome {
        if !self.is_awaiting() {
            self.store.set_pending(text);
        }
        self.submit(text).await
    }

    /// Submit the suggestion at `index`, bypassing the input field.
    ///
    /// Returns `None` when this mode has no such suggestion.
    pub async fn submit_suggestion(&self, index: usize) -> Option<SubmitOutcome> {
        let question = suggestions::get(self.context.mode, index)?;
        Some(self.submit(question).await)
    }

    /// Run one submission to completion.
    ///
    /// Blank text and submissions while another is in flight are no-ops.
    /// Transport failures never escape: they end up as an error entry plus
    /// the banner text.
    pub async fn submit(&self, raw_text: &str) -> SubmitOutcome {
        let event = Event::Submit {
            text: raw_text.to_string(),
        };

        match self.process_event(event).await {
            Ok(Some(outcome)) => outcome,
            Ok(None) => SubmitOutcome::Skipped(TransitionError::InvalidTransition(
                "submission ended without an outcome".to_string(),
            )),
            Err(e) => {
                tracing::debug!(
                    mode = self.context.mode.as_str(),
                    reason = %e,
                    "Submission ignored"
                );
                SubmitOutcome::Skipped(e)
            }
        }
    }

    async fn process_event(&self, event: Event) -> Result<Option<SubmitOutcome>, TransitionError> {
        let mut events_to_process = vec![event];
        let mut outcome = None;

        while let Some(current_event) = events_to_process.pop() {
            match &current_event {
                Event::Submit { .. } => {}
                Event::BackendReplied { .. } => outcome = Some(SubmitOutcome::Answered),
                Event::BackendFailed { error } => {
                    outcome = Some(SubmitOutcome::Failed(error.clone()));
                }
            }

            let result = self.step(current_event)?;

            for effect in result.effects {
                if let Some(generated_event) = self.execute_effect(effect).await {
                    events_to_process.push(generated_event);
                }
            }
        }

        Ok(outcome)
    }

    /// Pure transition under the guard. The new state is in place before any
    /// effect runs, so a second submit during the request sees `Awaiting`.
    fn step(&self, event: Event) -> Result<TransitionResult, TransitionError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let result = transition(&state, &self.context, event)?;
        state.clone_from(&result.new_state);
        Ok(result)
    }

    async fn execute_effect(&self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::AppendMessage(message) => {
                self.store.append(message);
                None
            }
            Effect::SetAwaiting(awaiting) => {
                self.store.set_awaiting(awaiting);
                None
            }
            Effect::SetError(error) => {
                self.store.set_error(error);
                None
            }
            Effect::ClearPending => {
                self.store.set_pending(String::new());
                None
            }
            Effect::RequestBackend { request, timeout } => {
                tracing::info!(
                    mode = self.context.mode.as_str(),
                    endpoint = request.endpoint(),
                    chars = request.text().chars().count(),
                    "Submitting to backend"
                );
                Some(match self.transport.send(&request, timeout).await {
                    Ok(reply) => Event::BackendReplied { reply },
                    Err(error) => Event::BackendFailed { error },
                })
            }
        }
    }
}

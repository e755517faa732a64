//! Property-based tests for the state machine
//!
//! These tests drive random submission sequences through `transition` and
//! check that the log and flags stay consistent.

use super::*;
use crate::session::{Message, MessageKind, SessionState};
use crate::transport::{
    BackendReply, ChatMode, ChatResponse, Chunk, RagResponse, TransportError,
};
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

/// Apply store effects the way the controller does, minus the I/O
fn apply(state: &mut SessionState, effects: &[Effect]) {
    for effect in effects {
        match effect {
            Effect::AppendMessage(msg) => state.log.push(msg.clone()),
            Effect::SetAwaiting(awaiting) => state.is_awaiting_response = *awaiting,
            Effect::SetError(error) => state.last_error.clone_from(error),
            Effect::ClearPending => state.pending_input.clear(),
            Effect::RequestBackend { .. } => {}
        }
    }
}

#[derive(Debug, Clone)]
enum Step {
    Submit(String),
    Reply(BackendReply),
    Fail(TransportError),
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z?' ]{1,40}",
        // Blank input in a few shapes
        Just(String::new()),
        "[ \t\n]{1,5}",
    ]
}

fn arb_chunk() -> impl Strategy<Value = Chunk> {
    ("[a-z ]{1,30}", 0.0f64..=1.0).prop_map(|(text, score)| Chunk { text, score })
}

fn arb_reply() -> impl Strategy<Value = BackendReply> {
    prop_oneof![
        (
            "[a-zA-Z ]{0,40}",
            proptest::option::of(proptest::collection::vec(arb_chunk(), 0..4)),
            proptest::option::of(0.0f64..30.0),
        )
            .prop_map(|(response, chunks, retrieval_time)| BackendReply::Rag(RagResponse {
                response,
                chunks,
                retrieval_time,
            })),
        ("[a-zA-Z ]{0,40}", proptest::option::of(0.0f64..30.0)).prop_map(
            |(response, generation_time)| BackendReply::Chat(ChatResponse {
                response,
                generation_time,
            })
        ),
    ]
}

fn arb_error() -> impl Strategy<Value = TransportError> {
    prop_oneof![
        "[a-z ]{0,20}".prop_map(|m| TransportError::network(m)),
        "[a-z ]{0,20}".prop_map(|m| TransportError::backend(m)),
        (400u16..600).prop_map(TransportError::status),
        Just(TransportError::timeout(std::time::Duration::from_secs(300))),
    ]
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => arb_text().prop_map(Step::Submit),
        1 => arb_reply().prop_map(Step::Reply),
        1 => arb_error().prop_map(Step::Fail),
    ]
}

fn arb_mode() -> impl Strategy<Value = ChatMode> {
    prop_oneof![Just(ChatMode::Rag), Just(ChatMode::Direct)]
}

fn to_event(step: Step) -> Event {
    match step {
        Step::Submit(text) => Event::Submit { text },
        Step::Reply(reply) => Event::BackendReplied { reply },
        Step::Fail(error) => Event::BackendFailed { error },
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Two log entries per resolved submission, user entry always first
    #[test]
    fn prop_log_is_two_entries_per_resolution(
        mode in arb_mode(),
        steps in proptest::collection::vec(arb_step(), 0..40),
    ) {
        let context = SessionContext::new(mode);
        let mut machine = SubmissionState::Idle;
        let mut session = SessionState::default();
        let mut resolved = 0usize;

        for step in steps {
            let was_awaiting = machine.is_awaiting();
            let is_resolution = !matches!(step, Step::Submit(_));
            let before = session.clone();

            match transition(&machine, &context, to_event(step)) {
                Ok(result) => {
                    apply(&mut session, &result.effects);
                    machine = result.new_state;
                    if is_resolution {
                        resolved += 1;
                        prop_assert_eq!(session.log.len(), 2 * resolved);
                        prop_assert!(!session.is_awaiting_response);
                        prop_assert!(session.pending_input.is_empty());
                    } else {
                        prop_assert!(!was_awaiting);
                        prop_assert_eq!(session.log.len(), 2 * resolved + 1);
                    }
                }
                Err(_) => {
                    // Rejected events never touch the session
                    prop_assert_eq!(&session, &before);
                }
            }

            // The rendered flag tracks the machine exactly
            prop_assert_eq!(session.is_awaiting_response, machine.is_awaiting());
        }

        // Strict alternation: user, outcome, user, outcome, ...
        for (i, msg) in session.log.iter().enumerate() {
            if i % 2 == 0 {
                prop_assert_eq!(msg.kind, MessageKind::User);
            } else {
                prop_assert_ne!(msg.kind, MessageKind::User);
            }
        }
    }

    /// Blank text never changes anything, whatever the state
    #[test]
    fn prop_blank_submit_is_rejected(
        mode in arb_mode(),
        blank in "[ \t\n]{0,8}",
        awaiting in any::<bool>(),
    ) {
        let context = SessionContext::new(mode);
        let state = if awaiting {
            SubmissionState::Awaiting { request: mode.request("in flight") }
        } else {
            SubmissionState::Idle
        };

        let result = transition(&state, &context, Event::Submit { text: blank });
        prop_assert_eq!(result.unwrap_err(), TransitionError::EmptyInput);
    }

    /// Only one request in flight: any non-blank submit while awaiting is refused
    #[test]
    fn prop_single_flight(
        mode in arb_mode(),
        first in "[a-z]{1,20}",
        second in "[a-z]{1,20}",
    ) {
        let context = SessionContext::new(mode);
        let accepted = transition(
            &SubmissionState::Idle,
            &context,
            Event::Submit { text: first },
        ).unwrap();

        let requests = accepted
            .effects
            .iter()
            .filter(|e| matches!(e, Effect::RequestBackend { .. }))
            .count();
        prop_assert_eq!(requests, 1);

        let refused = transition(&accepted.new_state, &context, Event::Submit { text: second });
        prop_assert_eq!(refused.unwrap_err(), TransitionError::Busy);
    }

    /// The user entry holds the trimmed text and is logged before the request
    #[test]
    fn prop_user_entry_precedes_request(
        mode in arb_mode(),
        text in "[ ]{0,3}[a-zA-Z?]{1,20}[ ]{0,3}",
    ) {
        let context = SessionContext::new(mode);
        let result = transition(
            &SubmissionState::Idle,
            &context,
            Event::Submit { text: text.clone() },
        ).unwrap();

        let append_at = result
            .effects
            .iter()
            .position(|e| *e == Effect::AppendMessage(Message::user(text.trim())));
        let request_at = result
            .effects
            .iter()
            .position(|e| matches!(e, Effect::RequestBackend { .. }));
        prop_assert!(append_at.is_some());
        prop_assert!(append_at < request_at);
    }

    /// Chunks reach the log exactly as the backend ordered them
    #[test]
    fn prop_chunk_order_preserved(
        chunks in proptest::collection::vec(arb_chunk(), 0..6),
    ) {
        let context = SessionContext::new(ChatMode::Rag);
        let state = SubmissionState::Awaiting { request: ChatMode::Rag.request("q") };
        let result = transition(&state, &context, Event::BackendReplied {
            reply: BackendReply::Rag(RagResponse {
                response: "a".to_string(),
                chunks: Some(chunks.clone()),
                retrieval_time: None,
            }),
        }).unwrap();

        let Effect::AppendMessage(msg) = &result.effects[0] else {
            return Err(TestCaseError::fail("first effect must append the answer"));
        };
        prop_assert_eq!(msg.retrieved_chunks.as_ref(), Some(&chunks));
    }

    /// Failures always produce exactly one error entry and one banner
    #[test]
    fn prop_failure_yields_one_error_entry(mode in arb_mode(), error in arb_error()) {
        let context = SessionContext::new(mode);
        let state = SubmissionState::Awaiting { request: mode.request("q") };
        let result = transition(&state, &context, Event::BackendFailed { error }).unwrap();

        let errors = result
            .effects
            .iter()
            .filter(|e| matches!(e, Effect::AppendMessage(m) if m.kind == MessageKind::Error))
            .count();
        let banners = result
            .effects
            .iter()
            .filter(|e| matches!(e, Effect::SetError(Some(msg)) if !msg.is_empty()))
            .count();
        prop_assert_eq!(errors, 1);
        prop_assert_eq!(banners, 1);
    }
}

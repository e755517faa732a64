//! Conversation sessions
//!
//! A session owns its log and single-flight state for the lifetime of the
//! view that created it. Sessions share nothing with each other.

mod controller;
mod message;
mod store;

pub use controller::{SessionController, SubmitOutcome};
pub use message::{Message, MessageKind, CHAT_APOLOGY, RAG_APOLOGY};
pub use store::{SessionState, SessionStore};

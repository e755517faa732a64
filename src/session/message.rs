//! Conversation log entries

use crate::transport::{BackendReply, ChatMode, Chunk};

/// Logged instead of the failure detail, which goes to the banner
pub const RAG_APOLOGY: &str =
    "Sorry, I encountered an error processing your question. Please try again.";
pub const CHAT_APOLOGY: &str =
    "Sorry, I encountered an error processing your message. Please try again.";

/// Who produced a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    User,
    Assistant,
    Error,
}

/// One entry in the conversation log
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
    /// Evidence behind a RAG answer, in backend order
    pub retrieved_chunks: Option<Vec<Chunk>>,
    /// Backend processing time, successful answers only
    pub elapsed_seconds: Option<f64>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::User,
            text: text.into(),
            retrieved_chunks: None,
            elapsed_seconds: None,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
            retrieved_chunks: None,
            elapsed_seconds: None,
        }
    }

    /// The fixed apology logged when a submission in `mode` fails
    pub fn apology(mode: ChatMode) -> Self {
        Self::error(match mode {
            ChatMode::Rag => RAG_APOLOGY,
            ChatMode::Direct => CHAT_APOLOGY,
        })
    }

    /// Build the assistant entry for a successful reply.
    ///
    /// RAG replies carry their chunks and `retrievalTime`; chat replies carry
    /// `generationTime` and never chunks.
    pub fn from_reply(reply: BackendReply) -> Self {
        let (text, retrieved_chunks, elapsed) = match reply {
            BackendReply::Rag(rag) => (rag.response, rag.chunks, rag.retrieval_time),
            BackendReply::Chat(chat) => (chat.response, None, chat.generation_time),
        };

        Self {
            kind: MessageKind::Assistant,
            text,
            retrieved_chunks,
            elapsed_seconds: elapsed.filter(|s| s.is_finite() && *s >= 0.0),
        }
    }

    /// Chunks worth rendering; an empty list counts as none
    pub fn chunks(&self) -> &[Chunk] {
        self.retrieved_chunks.as_deref().unwrap_or_default()
    }
}

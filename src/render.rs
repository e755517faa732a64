//! Plain-text rendering of session snapshots for the terminal

use crate::session::{Message, MessageKind, SessionState};
use crate::suggestions;
use crate::transport::ChatMode;
use std::fmt::Write as _;

pub const TYPING_INDICATOR: &str = "🤖 ...";

/// Greeting shown while a session's log is empty
pub fn welcome(mode: ChatMode) -> String {
    let mut out = String::from("Welcome! 👋\n");
    match mode {
        ChatMode::Rag => {
            out.push_str("Ask me anything about the resume using the suggestions below ");
            out.push_str("or type your own question.\n");
            out.push_str("Suggested Questions:\n");
            for (i, question) in suggestions::for_mode(mode).iter().enumerate() {
                let _ = writeln!(out, "  /{} {question}", i + 1);
            }
        }
        ChatMode::Direct => {
            out.push_str("Chat directly with the LLM. This mode does not use retrieval.\n");
        }
    }
    out
}

pub fn avatar(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::User => "👤",
        MessageKind::Assistant => "🤖",
        MessageKind::Error => "❌",
    }
}

/// One log entry with its chunks and timing
pub fn message(msg: &Message) -> String {
    let mut out = format!("{} {}\n", avatar(msg.kind), msg.text);

    let chunks = msg.chunks();
    if !chunks.is_empty() {
        let _ = writeln!(out, "   📄 Retrieved {} relevant chunks", chunks.len());
        for chunk in chunks {
            let _ = writeln!(out, "      Relevance: {}", chunk.relevance_percent());
            let _ = writeln!(out, "      {}", chunk.text);
        }
    }

    // A zero time is treated as not reported
    if let Some(secs) = msg.elapsed_seconds.filter(|s| *s > 0.0) {
        let _ = writeln!(out, "   ⏱️ Response time: {secs:.2}s");
    }

    out
}

pub fn banner(error: &str) -> String {
    format!("⚠️ {error}\n")
}

pub fn help() -> &'static str {
    "Commands:\n\
     \x20 /mode rag|chat   switch session (each keeps its own log)\n\
     \x20 /suggest         list suggested questions\n\
     \x20 /<n>             ask suggested question n\n\
     \x20 /dismiss         hide the error banner\n\
     \x20 /health          backend health\n\
     \x20 /stats           backend statistics\n\
     \x20 /load <pdf>      index a PDF on the backend\n\
     \x20 /help            this list\n\
     \x20 /quit            exit\n\
     Anything else is sent as a question.\n"
}

/// Turns successive snapshots of one session into incremental output.
///
/// Only what changed since the previous snapshot is printed: new log
/// entries, the typing indicator when a request starts, and the banner
/// when a new error appears.
#[derive(Debug, Default)]
pub struct SnapshotRenderer {
    shown: usize,
    awaiting: bool,
    error: Option<String>,
}

impl SnapshotRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replay the whole log, e.g. after switching sessions
    pub fn replay(&mut self, state: &SessionState, mode: ChatMode) -> String {
        *self = Self::new();
        if state.is_empty() && !state.is_awaiting_response {
            let mut out = welcome(mode);
            out.push_str(&self.render(state));
            return out;
        }
        self.render(state)
    }

    pub fn render(&mut self, state: &SessionState) -> String {
        let mut out = String::new();

        let appended = state.log.len() > self.shown;
        for msg in state.log.iter().skip(self.shown) {
            out.push_str(&message(msg));
        }
        self.shown = state.log.len();

        if state.is_awaiting_response && !self.awaiting {
            out.push_str(TYPING_INDICATOR);
            out.push('\n');
        }
        self.awaiting = state.is_awaiting_response;

        // Snapshots can coalesce, so a repeated failure shows up as the
        // same banner text plus new log entries
        if state.last_error != self.error || appended {
            if let Some(error) = &state.last_error {
                out.push_str(&banner(error));
            }
            self.error.clone_from(&state.last_error);
        }

        out
    }
}

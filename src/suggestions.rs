//! Canned questions offered as submission shortcuts

use crate::transport::ChatMode;

/// Offered on the empty RAG screen, in display order
pub const SUGGESTED_QUESTIONS: [&str; 6] = [
    "What is the candidate's total years of experience?",
    "What are the main technical skills and technologies?",
    "What projects has the candidate worked on?",
    "What is the candidate's current role and company?",
    "What certifications does the candidate have?",
    "Tell me about their education",
];

/// Suggestions a session in `mode` offers. Direct chat has none.
pub fn for_mode(mode: ChatMode) -> &'static [&'static str] {
    match mode {
        ChatMode::Rag => &SUGGESTED_QUESTIONS,
        ChatMode::Direct => &[],
    }
}

/// Zero-based lookup
pub fn get(mode: ChatMode, index: usize) -> Option<&'static str> {
    for_mode(mode).get(index).copied()
}

//! Wire types for the resume backend

use serde::{Deserialize, Serialize};

/// Which backend conversation a session talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChatMode {
    /// Answers grounded in retrieved resume chunks
    Rag,
    /// Plain model chat, no retrieval
    Direct,
}

impl ChatMode {
    pub fn endpoint(self) -> &'static str {
        match self {
            ChatMode::Rag => "/api/query",
            ChatMode::Direct => "/api/chat",
        }
    }

    /// Build the request body this mode sends for `text`
    pub fn request(self, text: impl Into<String>) -> BackendRequest {
        match self {
            ChatMode::Rag => BackendRequest::Query(QueryRequest {
                question: text.into(),
            }),
            ChatMode::Direct => BackendRequest::Chat(ChatRequest {
                message: text.into(),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChatMode::Rag => "rag",
            ChatMode::Direct => "chat",
        }
    }

    /// Parse the names accepted on the command line and in the environment
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rag" | "query" => Some(ChatMode::Rag),
            "chat" | "direct" | "llm" => Some(ChatMode::Direct),
            _ => None,
        }
    }
}

/// Body of `POST /api/query`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRequest {
    pub question: String,
}

/// Body of `POST /api/chat`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub message: String,
}

/// A request to one of the conversation endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BackendRequest {
    Query(QueryRequest),
    Chat(ChatRequest),
}

impl BackendRequest {
    pub fn mode(&self) -> ChatMode {
        match self {
            BackendRequest::Query(_) => ChatMode::Rag,
            BackendRequest::Chat(_) => ChatMode::Direct,
        }
    }

    pub fn endpoint(&self) -> &'static str {
        self.mode().endpoint()
    }

    /// The user text carried by the request
    pub fn text(&self) -> &str {
        match self {
            BackendRequest::Query(q) => &q.question,
            BackendRequest::Chat(c) => &c.message,
        }
    }
}

/// One retrieved evidence fragment, in backend order
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub score: f64,
}

impl Chunk {
    pub fn new(text: impl Into<String>, score: f64) -> Self {
        Self {
            text: text.into(),
            score,
        }
    }

    /// Relevance as a percentage with one decimal, e.g. `92.0%`
    pub fn relevance_percent(&self) -> String {
        format!("{:.1}%", self.score * 100.0)
    }
}

/// Successful `POST /api/query` body
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RagResponse {
    pub response: String,
    #[serde(default)]
    pub chunks: Option<Vec<Chunk>>,
    #[serde(default, rename = "retrievalTime")]
    pub retrieval_time: Option<f64>,
}

/// Successful `POST /api/chat` body
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default, rename = "generationTime")]
    pub generation_time: Option<f64>,
}

/// Parsed reply, tagged by the mode that asked for it
#[derive(Debug, Clone, PartialEq)]
pub enum BackendReply {
    Rag(RagResponse),
    Chat(ChatResponse),
}

impl BackendReply {
    pub fn text(&self) -> &str {
        match self {
            BackendReply::Rag(r) => &r.response,
            BackendReply::Chat(c) => &c.response,
        }
    }
}

/// `{error}` body the backend sends alongside failures
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `GET /health`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub rag_initialized: bool,
}

/// `GET /api/stats`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BackendStats {
    pub status: String,
    #[serde(default)]
    pub ollama_url: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub database_status: Option<String>,
}

/// Body of `POST /api/load-pdf`
#[derive(Debug, Clone, Serialize)]
pub struct LoadPdfRequest {
    pub pdf_path: String,
}

/// Successful `POST /api/load-pdf` body
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoadPdfResponse {
    pub status: String,
    pub message: String,
    #[serde(default)]
    pub chunks_indexed: usize,
}

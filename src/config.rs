//! Client configuration from the environment

use crate::transport::ChatMode;
use reqwest::Url;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:5001";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid backend URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Unknown chat mode {0:?}, expected \"rag\" or \"chat\"")]
    UnknownMode(String),
    #[error("Unknown log format {0:?}, expected \"text\" or \"json\"")]
    UnknownLogFormat(String),
}

/// Resolved client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// One backend for both modes
    pub api_url: Url,
    /// Mode the REPL starts in
    pub default_mode: ChatMode,
    pub log_format: LogFormat,
}

impl ChatConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from any key lookup; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw_url = get("CHAT_API_URL")
            .or_else(|| get("VITE_API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = parse_api_url(raw_url.trim())?;

        let default_mode = match get("CHAT_DEFAULT_MODE") {
            Some(raw) => ChatMode::parse(&raw).ok_or(ConfigError::UnknownMode(raw))?,
            None => ChatMode::Rag,
        };

        let log_format = match get("CHAT_LOG_FORMAT") {
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "text" | "pretty" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => return Err(ConfigError::UnknownLogFormat(raw)),
            },
            None => LogFormat::Text,
        };

        Ok(Self {
            api_url,
            default_mode,
            log_format,
        })
    }
}

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme {other:?}"))),
    }
}

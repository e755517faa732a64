//! reqwest-backed transport

use super::types::{
    BackendReply, BackendRequest, BackendStats, ChatMode, ChatResponse, ErrorBody, HealthStatus,
    LoadPdfRequest, LoadPdfResponse, RagResponse,
};
use super::{Transport, TransportError, REQUEST_TIMEOUT};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP transport bound to one backend base URL
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &Url) -> Result<Self, TransportError> {
        let client = Client::builder()
            .build()
            .map_err(|e| TransportError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<HealthStatus, TransportError> {
        self.exchange(self.client.get(self.url("/health")), REQUEST_TIMEOUT)
            .await
    }

    /// `GET /api/stats`
    pub async fn stats(&self) -> Result<BackendStats, TransportError> {
        self.exchange(self.client.get(self.url("/api/stats")), REQUEST_TIMEOUT)
            .await
    }

    /// Ask the backend to index a PDF that lives on the backend's filesystem
    pub async fn load_pdf(&self, pdf_path: &str) -> Result<LoadPdfResponse, TransportError> {
        let body = LoadPdfRequest {
            pdf_path: pdf_path.to_string(),
        };
        self.exchange(
            self.client.post(self.url("/api/load-pdf")).json(&body),
            REQUEST_TIMEOUT,
        )
        .await
    }

    async fn exchange<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        timeout: Duration,
    ) -> Result<T, TransportError> {
        let response = builder
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_request_error(&e, timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| classify_request_error(&e, timeout))?;

        if !status.is_success() {
            return Err(classify_status(status, &body));
        }

        decode_body(&body)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        request: &BackendRequest,
        timeout: Duration,
    ) -> Result<BackendReply, TransportError> {
        let builder = self.client.post(self.url(request.endpoint())).json(request);

        match request.mode() {
            ChatMode::Rag => self
                .exchange::<RagResponse>(builder, timeout)
                .await
                .map(BackendReply::Rag),
            ChatMode::Direct => self
                .exchange::<ChatResponse>(builder, timeout)
                .await
                .map(BackendReply::Chat),
        }
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn classify_request_error(e: &reqwest::Error, timeout: Duration) -> TransportError {
    if e.is_timeout() {
        TransportError::timeout(timeout)
    } else if e.is_connect() {
        TransportError::network(format!("Connection failed: {e}"))
    } else if e.is_request() || e.is_body() {
        TransportError::network(format!("Network error: {e}"))
    } else {
        TransportError::unknown(format!("Request failed: {e}"))
    }
}

fn classify_status(status: StatusCode, body: &str) -> TransportError {
    match backend_message(body) {
        Some(message) => TransportError::backend(message).with_status(status.as_u16()),
        None => TransportError::status(status.as_u16()),
    }
}

/// A 2xx body that does not fit the expected shape is a backend error. If it
/// still carries `{error}`, that text is what the user sees.
fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, TransportError> {
    serde_json::from_str(body).map_err(|e| match backend_message(body) {
        Some(message) => TransportError::backend(message),
        None => TransportError::backend(format!("Malformed response from backend: {e}")),
    })
}

/// The `{error}` text of a body, if it has any. A blank one counts as absent.
fn backend_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|err| err.error)
        .filter(|message| !message.trim().is_empty())
}

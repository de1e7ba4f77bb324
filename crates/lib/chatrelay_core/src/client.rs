//! Relay transport — how a client session reaches `POST /api/chat`.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::wire::{ChatRequest, ChatResponse};

/// Path of the relay endpoint, relative to the server root.
pub const CHAT_PATH: &str = "/api/chat";

/// Failures that never produced a usable relay response.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Could not reach relay: {0}")]
    Connect(String),

    #[error("Malformed relay response: {0}")]
    Malformed(String),
}

/// Sends a transcript to the relay and returns its answer.
///
/// A relay-reported failure (`{ "error": ... }`) is a successful transport
/// result; only unreachable relays and unreadable bodies are `Err`.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError>;
}

/// HTTP transport backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpRelayTransport {
    client: Client,
    endpoint: Url,
}

impl HttpRelayTransport {
    /// Targets `<server>/api/chat`.
    pub fn new(server: &Url) -> Result<Self, url::ParseError> {
        let endpoint = Url::parse(&format!(
            "{}{CHAT_PATH}",
            server.as_str().trim_end_matches('/')
        ))?;
        Ok(Self {
            client: Client::new(),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl RelayTransport for HttpRelayTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError> {
        let resp = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        debug!(%status, bytes = body.len(), "relay responded");

        // The relay answers failures with 500 and a JSON error body, so the
        // status alone does not decide the outcome.
        serde_json::from_slice::<ChatResponse>(&body)
            .map_err(|e| TransportError::Malformed(format!("{status}: {e}")))
    }
}

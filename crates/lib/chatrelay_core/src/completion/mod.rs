//! Completion module — forwards a conversation to an upstream LLM provider.
//!
//! # Public API
//!
//! - [`CompletionProvider`] — the seam the relay calls once per request
//! - [`openai::OpenAiProvider`] — OpenAI-compatible chat completions client
//! - [`config::CompletionConfig`] — provider credentials and endpoint
//!
//! Providers are stateless between calls: the full conversation arrives with
//! every request and nothing is retained afterwards.

pub mod config;
pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

use crate::turn::Turn;

pub use config::CompletionConfig;
pub use openai::OpenAiProvider;

/// Errors that can occur while requesting a completion.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Provider request failed: {0}")]
    Request(String),

    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Provider response parse error: {0}")]
    Parse(String),

    #[error("Provider returned no choices")]
    EmptyChoices,
}

/// Upstream completion provider.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send `messages` unmodified and return the assistant reply.
    async fn complete(&self, messages: &[Turn]) -> Result<Turn, CompletionError>;
}

//! OpenAI completion provider.
//!
//! Calls the chat completions API (`/chat/completions`) once per request.
//! No retries: a failed call is reported straight back to the relay.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::CompletionConfig;
use super::{CompletionError, CompletionProvider};
use crate::turn::Turn;

#[derive(Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: &'a [Turn],
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

#[derive(Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
}

/// Chat completions client holding a shared HTTP connection pool.
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: Client,
    config: CompletionConfig,
}

impl OpenAiProvider {
    pub fn new(config: CompletionConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, messages: &[Turn]) -> Result<Turn, CompletionError> {
        debug!(
            model = %self.config.model,
            messages = messages.len(),
            "requesting completion"
        );

        let resp = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&OpenAIRequest {
                model: &self.config.model,
                messages,
            })
            .send()
            .await
            .map_err(|e| CompletionError::Request(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(CompletionError::Status { status, body });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| CompletionError::Request(e.to_string()))?;

        parse_reply(&body)
    }
}

/// Extracts the first choice of a chat completions response as an assistant turn.
///
/// A `null` content is read as an empty reply.
fn parse_reply(body: &str) -> Result<Turn, CompletionError> {
    let data: OpenAIResponse =
        serde_json::from_str(body).map_err(|e| CompletionError::Parse(e.to_string()))?;

    let choice = data
        .choices
        .into_iter()
        .next()
        .ok_or(CompletionError::EmptyChoices)?;

    Ok(Turn::assistant(choice.message.content.unwrap_or_default()))
}

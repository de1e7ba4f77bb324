//! Completion provider configuration.
//!
//! Resolved once at startup from the server's flags and environment.

use url::Url;

use super::CompletionError;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Credentials and endpoint for the upstream provider.
#[derive(Clone)]
pub struct CompletionConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: Url,
}

impl CompletionConfig {
    /// Builds a config, validating the key and base URL.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: &str,
    ) -> Result<Self, CompletionError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(CompletionError::Config(
                "OPENAI_API_KEY must not be empty".to_string(),
            ));
        }

        let base_url = Url::parse(base_url)
            .map_err(|e| CompletionError::Config(format!("Invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            api_key,
            model: model.into(),
            base_url,
        })
    }

    /// Full URL of the chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.base_url.as_str().trim_end_matches('/')
        )
    }
}

// Keeps the key out of logs.
impl std::fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

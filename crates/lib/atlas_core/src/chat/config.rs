//! Provider configuration resolution from environment variables.

use std::env;

/// Model used when `OPENAI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";
/// API base used when `OPENAI_BASE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Resolved configuration for the completion provider.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Provider credential. Absence fails every turn before any call is made.
    pub api_key: Option<String>,
    /// Model identifier sent with each completion request.
    pub model: String,
    /// API base URL, overridable for OpenAI-compatible endpoints.
    pub base_url: String,
}

impl ChatConfig {
    /// Reads configuration from environment variables.
    ///
    /// | Variable          | Default                     |
    /// |-------------------|-----------------------------|
    /// | `OPENAI_API_KEY`  | none                        |
    /// | `OPENAI_MODEL`    | `gpt-4.1-mini`              |
    /// | `OPENAI_BASE_URL` | `https://api.openai.com/v1` |
    ///
    /// An empty `OPENAI_API_KEY` counts as unset.
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("OPENAI_API_KEY").ok().filter(|key| !key.is_empty()),
            model: env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        }
    }
}

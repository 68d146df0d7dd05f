// @zen-component: CHAT-TurnOrchestrator
//
//! Chat module — structured agent turns against an LLM completion provider.
//!
//! One turn is one validated transcript submission, one provider call with a
//! JSON-schema output constraint, and one validated [`schema::AgentReply`].
//! The transcript is owned by the caller and submitted whole on every turn;
//! nothing is kept between calls.
//!
//! # Public API
//!
//! - [`handle_chat_turn`] — run a single turn end to end
//! - [`schema::validate_chat_request`] — validate an untrusted request body
//! - [`schema::validate_agent_reply`] — validate the provider's JSON output
//! - [`config::ChatConfig`] — resolved provider configuration

pub mod config;
pub mod openai;
pub mod prompt;
pub mod schema;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use config::ChatConfig;
use schema::{AgentReply, ChatRequest};

/// Fixed message returned when the provider credential is absent.
pub const MISSING_API_KEY_MESSAGE: &str =
    "OPENAI_API_KEY is not set. Add it to your environment before using the agent.";

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Path to the offending field, e.g. `messages[3].content`.
    pub path: String,
    /// Constraint that was violated.
    pub message: String,
}

/// Errors that can occur while handling a chat turn.
///
/// All variants are terminal for the turn; nothing is retried.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation failed: {}", format_issues(.0))]
    Validation(Vec<FieldIssue>),

    #[error("Provider error: {0}")]
    Provider(String),
}

fn format_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("{}: {}", issue.path, issue.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Token accounting reported by the provider for one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// Outcome of a successful turn.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    /// The validated structured reply.
    pub reply: AgentReply,
    /// Token accounting, when the provider reports it.
    pub usage: Option<TokenUsage>,
}

/// Run a single chat turn: credential check, one provider call, validated
/// reply.
///
/// The credential is checked before anything leaves the process; a missing
/// key fails the turn with [`ChatError::Config`] and the fixed
/// [`MISSING_API_KEY_MESSAGE`].
pub async fn handle_chat_turn(
    client: &Client,
    config: &ChatConfig,
    request: &ChatRequest,
) -> Result<ChatTurn, ChatError> {
    if config.api_key.is_none() {
        return Err(ChatError::Config(MISSING_API_KEY_MESSAGE.to_string()));
    }

    let (reply, usage) = openai::complete(client, config, request).await?;

    Ok(ChatTurn { reply, usage })
}

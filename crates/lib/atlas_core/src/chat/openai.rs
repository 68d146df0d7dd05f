// @zen-component: CHAT-OpenAIProvider
//
//! OpenAI chat-completions provider.
//!
//! One call per turn against `{base}/chat/completions` with a JSON-schema
//! output constraint. There is no retry: a failed call fails the turn and
//! the caller decides whether to resubmit.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::config::ChatConfig;
use super::prompt::SYSTEM_PROMPT;
use super::schema::{self, AgentReply, ChatRequest};
use super::{ChatError, TokenUsage};

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
    json_schema: JsonSchemaFormat,
}

#[derive(Serialize)]
struct JsonSchemaFormat {
    name: &'static str,
    schema: Value,
    strict: bool,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
    usage: Option<TokenUsage>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Call the completion endpoint once and return the validated reply.
///
/// The system instruction is prepended to the caller's transcript and the
/// reply contract is attached as a `json_schema` response format, so the
/// model is constrained to emit what [`schema::validate_agent_reply`] will
/// accept. The output is still re-validated before it reaches a caller.
pub async fn complete(
    client: &Client,
    config: &ChatConfig,
    request: &ChatRequest,
) -> Result<(AgentReply, Option<TokenUsage>), ChatError> {
    let api_key = config
        .api_key
        .as_deref()
        .ok_or_else(|| ChatError::Config(super::MISSING_API_KEY_MESSAGE.to_string()))?;

    let mut messages = Vec::with_capacity(request.messages.len() + 1);
    messages.push(WireMessage {
        role: "system",
        content: SYSTEM_PROMPT,
    });
    for message in &request.messages {
        messages.push(WireMessage {
            role: message.role.as_str(),
            content: &message.content,
        });
    }

    let body = CompletionRequest {
        model: &config.model,
        messages,
        response_format: ResponseFormat {
            format_type: "json_schema",
            json_schema: JsonSchemaFormat {
                name: "AgentReply",
                schema: schema::agent_reply_schema(),
                strict: false,
            },
        },
    };

    let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));

    let response = client
        .post(&url)
        .header("Authorization", format!("Bearer {api_key}"))
        .json(&body)
        .send()
        .await
        .map_err(|e| ChatError::Provider(format!("completion request failed: {e}")))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());
        return Err(ChatError::Provider(format!(
            "completion request failed: {status} {body}"
        )));
    }

    let completion: CompletionResponse = response
        .json()
        .await
        .map_err(|e| ChatError::Provider(format!("completion response parse error: {e}")))?;

    let raw_output = completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.is_empty())
        .ok_or_else(|| ChatError::Provider("the model returned an empty response".to_string()))?;

    let parsed: Value = serde_json::from_str(&raw_output)
        .map_err(|e| ChatError::Provider(format!("model output is not valid JSON: {e}")))?;

    let reply = schema::validate_agent_reply(&parsed)?;

    Ok((reply, completion.usage))
}

// @zen-component: CHAT-ContractSchema
//
//! Chat contract schemas — request/reply shapes and their validation.
//!
//! Both directions of the contract live here: the untrusted inbound
//! transcript and the provider's structured output. Validation walks the raw
//! JSON and accumulates every violation with its field path, so a caller can
//! be told exactly which fields broke which bounds.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::{ChatError, FieldIssue};

/// Maximum characters in one transcript message.
pub const MAX_MESSAGE_CHARS: usize = 4000;
/// Maximum messages in one transcript.
pub const MAX_MESSAGES: usize = 24;
/// Maximum plan steps in a reply.
pub const MAX_PLAN_STEPS: usize = 6;
/// Maximum insight snippets in a reply.
pub const MAX_INSIGHTS: usize = 6;
/// Maximum cited sources in a reply.
pub const MAX_SOURCES: usize = 5;
/// Maximum follow-up suggestions in a reply.
pub const MAX_FOLLOW_UPS: usize = 4;

/// Speaker of a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatRole {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
}

impl ChatRole {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One transcript turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// A full transcript submission. Message order is chronological and is
/// preserved exactly through validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

/// A cited source in a reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub url: String,
}

/// Structured reply produced by one provider call.
///
/// Optional fields stay `None` when the model omitted them; normalization to
/// empty collections happens at the HTTP boundary, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentReply {
    #[serde(rename = "final")]
    pub final_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insights: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Source>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<Vec<String>>,
}

const REPLY_FIELDS: [&str; 6] = [
    "final",
    "plan",
    "insights",
    "confidence",
    "sources",
    "followUp",
];

/// Validate an untrusted request body against the transcript contract.
///
/// Unknown fields anywhere in the shape are rejected. Every violation is
/// collected; the result is all-or-nothing.
pub fn validate_chat_request(input: &Value) -> Result<ChatRequest, ChatError> {
    let Some(object) = input.as_object() else {
        return Err(single_issue("body", "must be a JSON object"));
    };

    let mut issues = Vec::new();

    for key in object.keys() {
        if key != "messages" {
            issues.push(FieldIssue {
                path: key.clone(),
                message: "unknown field".to_string(),
            });
        }
    }

    let mut messages = Vec::new();
    match object.get("messages") {
        Some(Value::Array(items)) => {
            if items.is_empty() {
                issues.push(FieldIssue {
                    path: "messages".to_string(),
                    message: "must contain at least 1 message".to_string(),
                });
            }
            if items.len() > MAX_MESSAGES {
                issues.push(FieldIssue {
                    path: "messages".to_string(),
                    message: format!("must contain at most {MAX_MESSAGES} messages"),
                });
            }
            for (index, item) in items.iter().enumerate() {
                if let Some(message) = validate_message(item, index, &mut issues) {
                    messages.push(message);
                }
            }
        }
        Some(_) => issues.push(FieldIssue {
            path: "messages".to_string(),
            message: "must be an array".to_string(),
        }),
        None => issues.push(FieldIssue {
            path: "messages".to_string(),
            message: "is required".to_string(),
        }),
    }

    if issues.is_empty() {
        Ok(ChatRequest { messages })
    } else {
        Err(ChatError::Validation(issues))
    }
}

fn validate_message(item: &Value, index: usize, issues: &mut Vec<FieldIssue>) -> Option<ChatMessage> {
    let path = format!("messages[{index}]");
    let Some(object) = item.as_object() else {
        issues.push(FieldIssue {
            path,
            message: "must be an object".to_string(),
        });
        return None;
    };

    for key in object.keys() {
        if key != "role" && key != "content" {
            issues.push(FieldIssue {
                path: format!("{path}.{key}"),
                message: "unknown field".to_string(),
            });
        }
    }

    let role = match object.get("role").and_then(Value::as_str) {
        Some("user") => Some(ChatRole::User),
        Some("assistant") => Some(ChatRole::Assistant),
        _ => {
            issues.push(FieldIssue {
                path: format!("{path}.role"),
                message: "must be \"user\" or \"assistant\"".to_string(),
            });
            None
        }
    };

    let content = match object.get("content") {
        Some(Value::String(text)) if text.is_empty() => {
            issues.push(FieldIssue {
                path: format!("{path}.content"),
                message: "must not be empty".to_string(),
            });
            None
        }
        Some(Value::String(text)) if text.chars().count() > MAX_MESSAGE_CHARS => {
            issues.push(FieldIssue {
                path: format!("{path}.content"),
                message: format!("must be at most {MAX_MESSAGE_CHARS} characters"),
            });
            None
        }
        Some(Value::String(text)) => Some(text.clone()),
        _ => {
            issues.push(FieldIssue {
                path: format!("{path}.content"),
                message: "must be a string".to_string(),
            });
            None
        }
    };

    match (role, content) {
        (Some(role), Some(content)) => Some(ChatMessage { role, content }),
        _ => None,
    }
}

/// Validate the provider's parsed JSON output against the reply contract.
///
/// `final` must be present and non-empty; optional fields, when present,
/// must respect their bounds. Any schema-conforming output is accepted
/// regardless of semantic content.
pub fn validate_agent_reply(input: &Value) -> Result<AgentReply, ChatError> {
    let Some(object) = input.as_object() else {
        return Err(single_issue("body", "must be a JSON object"));
    };

    let mut issues = Vec::new();

    for key in object.keys() {
        if !REPLY_FIELDS.contains(&key.as_str()) {
            issues.push(FieldIssue {
                path: key.clone(),
                message: "unknown field".to_string(),
            });
        }
    }

    let final_text = match object.get("final") {
        Some(Value::String(text)) if text.is_empty() => {
            issues.push(FieldIssue {
                path: "final".to_string(),
                message: "must not be empty".to_string(),
            });
            None
        }
        Some(Value::String(text)) => Some(text.clone()),
        Some(_) => {
            issues.push(FieldIssue {
                path: "final".to_string(),
                message: "must be a string".to_string(),
            });
            None
        }
        None => {
            issues.push(FieldIssue {
                path: "final".to_string(),
                message: "is required".to_string(),
            });
            None
        }
    };

    let plan = string_list(object.get("plan"), "plan", MAX_PLAN_STEPS, &mut issues);
    let insights = string_list(object.get("insights"), "insights", MAX_INSIGHTS, &mut issues);
    let follow_up = string_list(object.get("followUp"), "followUp", MAX_FOLLOW_UPS, &mut issues);

    let confidence = match object.get("confidence") {
        Some(value) => match value.as_f64() {
            Some(number) if (0.0..=1.0).contains(&number) => Some(number),
            Some(_) => {
                issues.push(FieldIssue {
                    path: "confidence".to_string(),
                    message: "must be between 0 and 1".to_string(),
                });
                None
            }
            None => {
                issues.push(FieldIssue {
                    path: "confidence".to_string(),
                    message: "must be a number".to_string(),
                });
                None
            }
        },
        None => None,
    };

    let sources = match object.get("sources") {
        Some(Value::Array(items)) => {
            if items.len() > MAX_SOURCES {
                issues.push(FieldIssue {
                    path: "sources".to_string(),
                    message: format!("must contain at most {MAX_SOURCES} sources"),
                });
            }
            let mut list = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                if let Some(source) = validate_source(item, index, &mut issues) {
                    list.push(source);
                }
            }
            Some(list)
        }
        Some(_) => {
            issues.push(FieldIssue {
                path: "sources".to_string(),
                message: "must be an array".to_string(),
            });
            None
        }
        None => None,
    };

    match (final_text, issues.is_empty()) {
        (Some(final_text), true) => Ok(AgentReply {
            final_text,
            plan,
            insights,
            confidence,
            sources,
            follow_up,
        }),
        _ => Err(ChatError::Validation(issues)),
    }
}

fn string_list(
    value: Option<&Value>,
    path: &str,
    max: usize,
    issues: &mut Vec<FieldIssue>,
) -> Option<Vec<String>> {
    match value {
        Some(Value::Array(items)) => {
            if items.len() > max {
                issues.push(FieldIssue {
                    path: path.to_string(),
                    message: format!("must contain at most {max} entries"),
                });
            }
            let mut list = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                match item {
                    Value::String(text) if text.is_empty() => issues.push(FieldIssue {
                        path: format!("{path}[{index}]"),
                        message: "must not be empty".to_string(),
                    }),
                    Value::String(text) => list.push(text.clone()),
                    _ => issues.push(FieldIssue {
                        path: format!("{path}[{index}]"),
                        message: "must be a string".to_string(),
                    }),
                }
            }
            Some(list)
        }
        Some(_) => {
            issues.push(FieldIssue {
                path: path.to_string(),
                message: "must be an array".to_string(),
            });
            None
        }
        None => None,
    }
}

fn validate_source(item: &Value, index: usize, issues: &mut Vec<FieldIssue>) -> Option<Source> {
    let path = format!("sources[{index}]");
    let Some(object) = item.as_object() else {
        issues.push(FieldIssue {
            path,
            message: "must be an object".to_string(),
        });
        return None;
    };

    for key in object.keys() {
        if key != "title" && key != "url" {
            issues.push(FieldIssue {
                path: format!("{path}.{key}"),
                message: "unknown field".to_string(),
            });
        }
    }

    let title = match object.get("title") {
        Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
        Some(Value::String(_)) => {
            issues.push(FieldIssue {
                path: format!("{path}.title"),
                message: "must not be empty".to_string(),
            });
            None
        }
        _ => {
            issues.push(FieldIssue {
                path: format!("{path}.title"),
                message: "must be a string".to_string(),
            });
            None
        }
    };

    let url = match object.get("url") {
        Some(Value::String(text)) if Url::parse(text).is_ok() => Some(text.clone()),
        Some(Value::String(_)) => {
            issues.push(FieldIssue {
                path: format!("{path}.url"),
                message: "must be a valid URL".to_string(),
            });
            None
        }
        _ => {
            issues.push(FieldIssue {
                path: format!("{path}.url"),
                message: "must be a string".to_string(),
            });
            None
        }
    };

    match (title, url) {
        (Some(title), Some(url)) => Some(Source { title, url }),
        _ => None,
    }
}

/// JSON schema handed to the provider as the structured output constraint.
///
/// Mirrors [`validate_agent_reply`]: the provider is told to emit only what
/// the validator will accept.
pub fn agent_reply_schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "final": { "type": "string" },
            "plan": {
                "type": "array",
                "items": { "type": "string" },
                "maxItems": MAX_PLAN_STEPS,
            },
            "insights": {
                "type": "array",
                "items": { "type": "string" },
                "maxItems": MAX_INSIGHTS,
            },
            "confidence": {
                "type": "number",
                "minimum": 0,
                "maximum": 1,
            },
            "sources": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "url": { "type": "string", "format": "uri" },
                    },
                    "required": ["title", "url"],
                    "additionalProperties": false,
                },
                "maxItems": MAX_SOURCES,
            },
            "followUp": {
                "type": "array",
                "items": { "type": "string" },
                "maxItems": MAX_FOLLOW_UPS,
            },
        },
        "required": ["final"],
        "additionalProperties": false,
    })
}

fn single_issue(path: &str, message: &str) -> ChatError {
    ChatError::Validation(vec![FieldIssue {
        path: path.to_string(),
        message: message.to_string(),
    }])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn issues(err: ChatError) -> Vec<FieldIssue> {
        match err {
            ChatError::Validation(issues) => issues,
            other => panic!("expected Validation error, got: {other}"),
        }
    }

    fn has_issue(issues: &[FieldIssue], path: &str) -> bool {
        issues.iter().any(|issue| issue.path == path)
    }

    // @zen-test: CHAT_P-1
    #[test]
    fn valid_request_preserves_message_order() {
        let body = json!({
            "messages": [
                { "role": "user", "content": "Plan a launch" },
                { "role": "assistant", "content": "Here is a plan" },
                { "role": "user", "content": "Shorten it" },
            ]
        });
        let request = validate_chat_request(&body).expect("valid request");
        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[0].role, ChatRole::User);
        assert_eq!(request.messages[1].role, ChatRole::Assistant);
        assert_eq!(request.messages[2].content, "Shorten it");
    }

    // @zen-test: CHAT_P-1
    #[test]
    fn request_accepts_boundary_sizes() {
        let long = "x".repeat(MAX_MESSAGE_CHARS);
        let messages: Vec<_> = (0..MAX_MESSAGES)
            .map(|_| json!({ "role": "user", "content": long.as_str() }))
            .collect();
        let request = validate_chat_request(&json!({ "messages": messages }))
            .expect("boundary request");
        assert_eq!(request.messages.len(), MAX_MESSAGES);
    }

    // @zen-test: CHAT_P-2
    #[test]
    fn request_rejects_empty_transcript() {
        let err = validate_chat_request(&json!({ "messages": [] })).expect_err("empty");
        assert!(has_issue(&issues(err), "messages"));
    }

    // @zen-test: CHAT_P-2
    #[test]
    fn request_rejects_oversized_transcript() {
        let messages: Vec<_> = (0..MAX_MESSAGES + 1)
            .map(|_| json!({ "role": "user", "content": "hi" }))
            .collect();
        let err = validate_chat_request(&json!({ "messages": messages })).expect_err("too many");
        assert!(has_issue(&issues(err), "messages"));
    }

    // @zen-test: CHAT_P-2
    #[test]
    fn request_rejects_oversized_content_with_path() {
        let body = json!({
            "messages": [
                { "role": "user", "content": "ok" },
                { "role": "user", "content": "y".repeat(MAX_MESSAGE_CHARS + 1) },
            ]
        });
        let err = validate_chat_request(&body).expect_err("oversized content");
        assert!(has_issue(&issues(err), "messages[1].content"));
    }

    // @zen-test: CHAT_P-2
    #[test]
    fn request_rejects_unknown_role() {
        let body = json!({ "messages": [{ "role": "system", "content": "hi" }] });
        let err = validate_chat_request(&body).expect_err("unknown role");
        assert!(has_issue(&issues(err), "messages[0].role"));
    }

    // @zen-test: CHAT_P-2
    #[test]
    fn request_rejects_empty_content() {
        let body = json!({ "messages": [{ "role": "user", "content": "" }] });
        let err = validate_chat_request(&body).expect_err("empty content");
        assert!(has_issue(&issues(err), "messages[0].content"));
    }

    // @zen-test: CHAT_P-2
    #[test]
    fn request_rejects_unknown_fields() {
        let body = json!({
            "messages": [{ "role": "user", "content": "hi", "id": 7 }],
            "stream": true,
        });
        let err = validate_chat_request(&body).expect_err("unknown fields");
        let issues = issues(err);
        assert!(has_issue(&issues, "stream"));
        assert!(has_issue(&issues, "messages[0].id"));
    }

    // @zen-test: CHAT_P-2
    #[test]
    fn request_rejects_non_object_body() {
        let err = validate_chat_request(&json!([1, 2, 3])).expect_err("array body");
        assert!(has_issue(&issues(err), "body"));
    }

    // @zen-test: CHAT_P-2
    #[test]
    fn request_collects_all_issues_at_once() {
        let body = json!({
            "messages": [
                { "role": "robot", "content": "" },
                { "role": "user", "content": "fine" },
            ]
        });
        let err = validate_chat_request(&body).expect_err("two issues");
        let issues = issues(err);
        assert!(has_issue(&issues, "messages[0].role"));
        assert!(has_issue(&issues, "messages[0].content"));
    }

    // @zen-test: CHAT_P-3
    #[test]
    fn reply_requires_final() {
        let err = validate_agent_reply(&json!({ "plan": ["Step 1"] })).expect_err("no final");
        assert!(has_issue(&issues(err), "final"));
    }

    // @zen-test: CHAT_P-3
    #[test]
    fn reply_with_final_only_leaves_optionals_absent() {
        let reply = validate_agent_reply(&json!({ "final": "Done" })).expect("minimal reply");
        assert_eq!(reply.final_text, "Done");
        assert!(reply.plan.is_none());
        assert!(reply.insights.is_none());
        assert!(reply.confidence.is_none());
        assert!(reply.sources.is_none());
        assert!(reply.follow_up.is_none());
    }

    // @zen-test: CHAT_P-3
    #[test]
    fn reply_accepts_every_field_within_bounds() {
        let body = json!({
            "final": "Here is a plan",
            "plan": ["Step 1", "Step 2"],
            "insights": ["Fact"],
            "confidence": 0.85,
            "sources": [{ "title": "Docs", "url": "https://example.com/docs" }],
            "followUp": ["Want a timeline?"],
        });
        let reply = validate_agent_reply(&body).expect("full reply");
        assert_eq!(reply.plan.as_deref(), Some(&["Step 1".to_string(), "Step 2".to_string()][..]));
        assert_eq!(reply.confidence, Some(0.85));
        assert_eq!(reply.sources.as_ref().map(Vec::len), Some(1));
        assert_eq!(reply.follow_up.as_ref().map(Vec::len), Some(1));
    }

    // @zen-test: CHAT_P-4
    #[test]
    fn reply_rejects_oversized_collections() {
        let seven: Vec<_> = (0..7).map(|i| format!("item {i}")).collect();
        let err = validate_agent_reply(&json!({ "final": "x", "plan": seven.clone() }))
            .expect_err("plan too long");
        assert!(has_issue(&issues(err), "plan"));

        let err = validate_agent_reply(&json!({ "final": "x", "insights": seven }))
            .expect_err("insights too long");
        assert!(has_issue(&issues(err), "insights"));

        let five: Vec<_> = (0..5).map(|i| format!("follow {i}")).collect();
        let err = validate_agent_reply(&json!({ "final": "x", "followUp": five }))
            .expect_err("followUp too long");
        assert!(has_issue(&issues(err), "followUp"));

        let six_sources: Vec<_> = (0..6)
            .map(|i| json!({ "title": format!("s{i}"), "url": "https://example.com" }))
            .collect();
        let err = validate_agent_reply(&json!({ "final": "x", "sources": six_sources }))
            .expect_err("sources too long");
        assert!(has_issue(&issues(err), "sources"));
    }

    // @zen-test: CHAT_P-4
    #[test]
    fn reply_rejects_confidence_out_of_range() {
        for bad in [-0.1, 1.1] {
            let err = validate_agent_reply(&json!({ "final": "x", "confidence": bad }))
                .expect_err("confidence out of range");
            assert!(has_issue(&issues(err), "confidence"));
        }
        for good in [0.0, 1.0] {
            let reply = validate_agent_reply(&json!({ "final": "x", "confidence": good }))
                .expect("confidence at bound");
            assert_eq!(reply.confidence, Some(good));
        }
    }

    // @zen-test: CHAT_P-4
    #[test]
    fn reply_rejects_empty_list_entries() {
        let err = validate_agent_reply(&json!({ "final": "x", "plan": ["ok", ""] }))
            .expect_err("empty entry");
        assert!(has_issue(&issues(err), "plan[1]"));
    }

    // @zen-test: CHAT_P-4
    #[test]
    fn reply_rejects_invalid_source() {
        let body = json!({
            "final": "x",
            "sources": [
                { "title": "", "url": "not a url" },
                { "title": "Docs", "url": "https://example.com", "rank": 1 },
            ],
        });
        let err = validate_agent_reply(&body).expect_err("bad sources");
        let issues = issues(err);
        assert!(has_issue(&issues, "sources[0].title"));
        assert!(has_issue(&issues, "sources[0].url"));
        assert!(has_issue(&issues, "sources[1].rank"));
    }

    // @zen-test: CHAT_P-4
    #[test]
    fn reply_rejects_unknown_fields() {
        let err = validate_agent_reply(&json!({ "final": "x", "reasoning": "..." }))
            .expect_err("unknown field");
        assert!(has_issue(&issues(err), "reasoning"));
    }

    // @zen-test: CHAT_P-5
    #[test]
    fn reply_round_trips_through_serde() {
        let body = json!({
            "final": "Here is a plan",
            "plan": ["Step 1", "Step 2"],
            "confidence": 0.5,
            "sources": [{ "title": "Docs", "url": "https://example.com/docs" }],
        });
        let reply = validate_agent_reply(&body).expect("valid reply");

        let serialized = serde_json::to_value(&reply).expect("serialize");
        let round_tripped = validate_agent_reply(&serialized).expect("re-validate");

        assert_eq!(reply, round_tripped);
        // Omitted optionals must not appear in the serialized form.
        assert!(serialized.get("insights").is_none());
        assert!(serialized.get("followUp").is_none());
    }

    #[test]
    fn schema_constrains_every_optional_field() {
        let schema = agent_reply_schema();
        assert_eq!(schema["required"], json!(["final"]));
        assert_eq!(schema["additionalProperties"], json!(false));
        assert_eq!(schema["properties"]["plan"]["maxItems"], json!(MAX_PLAN_STEPS));
        assert_eq!(schema["properties"]["sources"]["maxItems"], json!(MAX_SOURCES));
        assert_eq!(schema["properties"]["followUp"]["maxItems"], json!(MAX_FOLLOW_UPS));
        assert_eq!(schema["properties"]["confidence"]["maximum"], json!(1));
    }
}

// @zen-component: CHAT-TurnHandler
//
//! Chat request handler — one structured agent turn per request.

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use tracing::error;

use atlas_core::chat::schema::{self, Source};
use atlas_core::chat::{self, ChatError, TokenUsage};

use crate::AppState;
use crate::error::{AppError, AppResult};

/// Success payload for `POST /api/chat`.
///
/// Optional reply fields are normalized here: absent collections become
/// empty, absent confidence becomes `null`. The UI treats "nothing to show"
/// and "field omitted" identically.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurnResponse {
    pub reply: String,
    pub plan: Vec<String>,
    pub insights: Vec<String>,
    pub confidence: Option<f64>,
    pub sources: Vec<Source>,
    pub follow_up: Vec<String>,
    pub usage: Option<TokenUsage>,
}

/// `POST /api/chat` — validate the transcript, run one provider turn, return
/// the normalized structured reply.
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<Json<ChatTurnResponse>> {
    let request = schema::validate_chat_request(&body)?;

    let turn = chat::handle_chat_turn(&state.http, &state.config.chat, &request)
        .await
        .map_err(|e| {
            error!("chat turn failed: {e}");
            match e {
                // Reply-side schema violations are processing failures for
                // this turn, not client errors.
                invalid @ ChatError::Validation(_) => AppError::Provider(invalid.to_string()),
                other => AppError::from(other),
            }
        })?;

    let reply = turn.reply;
    Ok(Json(ChatTurnResponse {
        reply: reply.final_text,
        plan: reply.plan.unwrap_or_default(),
        insights: reply.insights.unwrap_or_default(),
        confidence: reply.confidence,
        sources: reply.sources.unwrap_or_default(),
        follow_up: reply.follow_up.unwrap_or_default(),
        usage: turn.usage,
    }))
}

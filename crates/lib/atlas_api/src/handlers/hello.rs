//! Hello world endpoint — bootstrap health check.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::AppState;
use crate::error::AppResult;

/// Response for `GET /api/hello`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HelloWorldResponse {
    pub greeting: String,
    pub provider_configured: bool,
    pub model: String,
}

/// `GET /api/hello` — verifies the core lib and provider configuration.
pub async fn hello_world(State(state): State<AppState>) -> AppResult<Json<HelloWorldResponse>> {
    Ok(Json(HelloWorldResponse {
        greeting: format!("Hello from atlas_core v{}", atlas_core::version()),
        provider_configured: state.config.chat.api_key.is_some(),
        model: state.config.chat.model.clone(),
    }))
}

//! # atlas_api
//!
//! HTTP API library for Atlas.

pub mod config;
pub mod error;
pub mod handlers;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use crate::config::ApiConfig;
use crate::handlers::{chat, hello};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Stateless HTTPS client used to reach the completion provider.
    pub http: reqwest::Client,
    /// API configuration.
    pub config: ApiConfig,
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/hello", get(hello::hello_world))
        .route("/api/chat", post(chat::chat_handler))
        .layer(cors)
        .with_state(state)
}

//! # chatrelay_api
//!
//! HTTP relay for the chat widget: a single `POST /api/chat` route plus the
//! static page and script, served as-is.

pub mod config;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::post;
use chatrelay_core::client::CHAT_PATH;
use chatrelay_core::completion::CompletionProvider;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::chat;

/// Shared application state passed to all handlers.
///
/// Holds no conversation data: every request carries its own transcript.
#[derive(Clone)]
pub struct AppState {
    /// Upstream completion provider.
    pub provider: Arc<dyn CompletionProvider>,
    /// API configuration.
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(provider: Arc<dyn CompletionProvider>, config: ApiConfig) -> Self {
        Self { provider, config }
    }
}

/// Builds the Axum router with the relay route, static assets and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Anything that is not the relay route is looked up in the public dir,
    // with `/` resolving to `index.html`.
    let assets = ServeDir::new(&state.config.public_dir);

    Router::new()
        .route(CHAT_PATH, post(chat::chat_handler))
        .fallback_service(assets)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

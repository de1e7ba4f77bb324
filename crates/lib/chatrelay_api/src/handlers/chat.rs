//! Chat relay handler.
//!
//! `POST /api/chat` takes the client's whole transcript, hands it to the
//! completion provider as-is, and answers with the provider's reply.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use chatrelay_core::{ChatRequest, ChatResponse};
use tracing::debug;

use crate::AppState;
use crate::error::{AppError, AppResult};

/// `POST /api/chat` — relay a transcript to the provider and return its reply.
pub async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    let Json(request) = payload.map_err(|e| AppError::InvalidRequest(e.body_text()))?;

    if request.messages.is_empty() {
        return Err(AppError::InvalidRequest(
            "messages must not be empty".into(),
        ));
    }

    debug!(messages = request.messages.len(), "relaying chat request");

    let reply = state.provider.complete(&request.messages).await?;

    debug!(chars = reply.content().len(), "relaying chat reply");
    Ok(Json(ChatResponse::reply(reply)))
}

//! Chat turn HTTP handlers.
//!
//! Endpoints:
//! - POST /api/chat  - Run one chat turn against the selected persona
//! - POST /api/clear - Clear a conversation's messages, keeping the row

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::http::error::AppError;
use crate::state::AppState;

use super::{default_bot_id, default_session_id};

/// Request body for `POST /api/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default = "default_session_id")]
    pub session_id: String,
    #[serde(default = "default_bot_id")]
    pub bot_id: String,
}

/// Response body for `POST /api/chat`.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: String,
    pub response_time: i64,
}

/// POST /api/chat - Run one chat turn: persist the user message, forward
/// the conversation upstream, persist and return the reply.
pub async fn send_message(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let reply = state
        .chat
        .send_message(&body.session_id, &body.bot_id, body.message.trim())
        .await?;

    Ok(Json(ChatResponse {
        response: reply.text,
        session_id: reply.conversation_id,
        response_time: reply.response_time,
    }))
}

/// Request body for `POST /api/clear`.
#[derive(Debug, Deserialize)]
pub struct ClearRequest {
    #[serde(default = "default_session_id")]
    pub session_id: String,
}

/// POST /api/clear - Delete all messages from a conversation. The
/// conversation row itself survives.
pub async fn clear_conversation(
    State(state): State<AppState>,
    Json(body): Json<ClearRequest>,
) -> Result<Json<Value>, AppError> {
    state.chat.clear_conversation(&body.session_id).await?;
    Ok(Json(json!({ "status": "cleared" })))
}

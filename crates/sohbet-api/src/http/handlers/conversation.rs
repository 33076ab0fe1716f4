//! Conversation management HTTP handlers.
//!
//! Endpoints:
//! - GET    /api/conversations                - List a bot's conversations
//! - GET    /api/conversations/{id}           - Get a conversation with messages
//! - DELETE /api/conversations/{id}           - Delete a conversation
//! - PUT    /api/conversations/{id}/title     - Replace the title
//! - POST   /api/conversations/{id}/summarize - Summarize the conversation

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use sohbet_types::chat::{ChatMessage, Conversation, ConversationPreview};

use crate::http::error::AppError;
use crate::state::AppState;

use super::default_bot_id;

/// Query parameters for `GET /api/conversations`.
#[derive(Debug, Deserialize)]
pub struct ConversationListQuery {
    #[serde(default = "default_bot_id")]
    pub bot_id: String,
}

/// GET /api/conversations - List a bot's conversations for the sidebar,
/// most-recently-active first.
pub async fn list_conversations(
    State(state): State<AppState>,
    Query(query): Query<ConversationListQuery>,
) -> Result<Json<Vec<ConversationPreview>>, AppError> {
    let conversations = state.chat.list_conversations(&query.bot_id).await?;
    Ok(Json(conversations))
}

/// Response body for `GET /api/conversations/{id}`.
#[derive(Debug, Serialize)]
pub struct ConversationDetail {
    pub conversation: Conversation,
    pub messages: Vec<ChatMessage>,
}

/// GET /api/conversations/{id} - Get a conversation and its messages in
/// chronological order.
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ConversationDetail>, AppError> {
    let (conversation, messages) = state.chat.conversation_with_messages(&id).await?;
    Ok(Json(ConversationDetail {
        conversation,
        messages,
    }))
}

/// DELETE /api/conversations/{id} - Delete a conversation and its
/// messages. Idempotent: deleting an unknown id still reports success.
pub async fn delete_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    state.chat.delete_conversation(&id).await?;
    Ok(Json(json!({ "status": "deleted" })))
}

/// Request body for `PUT /api/conversations/{id}/title`.
#[derive(Debug, Deserialize)]
pub struct TitleRequest {
    #[serde(default)]
    pub title: String,
}

/// PUT /api/conversations/{id}/title - Replace a conversation's title
/// with caller-supplied text.
pub async fn update_title(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<TitleRequest>,
) -> Result<Json<Value>, AppError> {
    state
        .chat
        .rename_conversation(&id, body.title.trim())
        .await?;
    Ok(Json(json!({ "status": "updated" })))
}

/// Request body for `POST /api/conversations/{id}/summarize`.
#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default = "default_bot_id")]
    pub bot_id: String,
}

/// POST /api/conversations/{id}/summarize - Summarize the conversation
/// with the bot's localized template. A well-formed summary also
/// replaces the conversation title.
pub async fn summarize_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<SummarizeRequest>,
) -> Result<Json<Value>, AppError> {
    let summary = state.chat.summarize_conversation(&id, &body.bot_id).await?;
    Ok(Json(json!({ "summary": summary, "conversation_id": id })))
}

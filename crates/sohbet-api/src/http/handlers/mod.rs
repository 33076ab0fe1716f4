//! HTTP request handlers for the REST API.

pub mod chat;
pub mod conversation;
pub mod xp;

/// Conversation id used when a request body omits one.
pub(crate) fn default_session_id() -> String {
    "default".to_string()
}

/// Persona id used when a request omits one.
pub(crate) fn default_bot_id() -> String {
    sohbet_types::bot::DEFAULT_BOT_ID.to_string()
}

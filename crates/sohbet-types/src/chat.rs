//! Conversation and message types for Sohbet.
//!
//! These types model persisted chat state: conversations owned by a bot
//! persona, the ordered messages within them, and the projections handed
//! to the HTTP layer and the upstream completion service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Title given to a conversation that has not earned one yet.
pub const DEFAULT_TITLE: &str = "New Chat";

/// Maximum number of characters a derived title keeps before truncation.
pub const TITLE_MAX_CHARS: usize = 50;

/// Role of a persisted chat message.
///
/// Maps to the CHECK constraint in the schema:
/// `CHECK (role IN ('user', 'assistant'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A conversation between a user and a bot persona.
///
/// The id is caller-supplied (the web client mints one per browser tab),
/// so it is an opaque string rather than a generated key. Conversations
/// belong to a single bot (identified by `bot_id`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub bot_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Derive a conversation title from its first user message.
    ///
    /// Keeps the first [`TITLE_MAX_CHARS`] characters and appends an
    /// ellipsis when the content is longer. Counts characters, not bytes,
    /// so multi-byte text is never split mid-character.
    pub fn title_from_first_message(content: &str) -> String {
        if content.chars().count() > TITLE_MAX_CHARS {
            let truncated: String = content.chars().take(TITLE_MAX_CHARS).collect();
            format!("{truncated}...")
        } else {
            content.to_string()
        }
    }
}

/// A single persisted message within a conversation.
///
/// Messages are ordered by `created_at` (with the auto-assigned `id` as
/// tie-break) within a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub conversation_id: String,
    pub role: MessageRole,
    pub content: String,
    /// Upstream latency in whole seconds (assistant messages only).
    pub response_time: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Payload for appending a message to a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    pub role: MessageRole,
    pub content: String,
    pub response_time: Option<i64>,
}

impl NewMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            response_time: None,
        }
    }

    pub fn assistant(content: impl Into<String>, response_time: i64) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            response_time: Some(response_time),
        }
    }
}

/// A message projected for the upstream completion service.
///
/// Only role and content survive the projection; ids, timestamps, and
/// latency metadata never leave the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl From<&ChatMessage> for Message {
    fn from(msg: &ChatMessage) -> Self {
        Message {
            role: msg.role,
            content: msg.content.clone(),
        }
    }
}

/// A conversation as it appears in the sidebar listing: the row itself
/// plus a preview of its most recent message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationPreview {
    pub id: String,
    pub bot_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_message: Option<String>,
}

/// Outcome of a completed chat turn: the assistant reply plus the
/// conversation it was appended to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub text: String,
    pub conversation_id: String,
    /// Upstream latency in whole seconds.
    pub response_time: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_roundtrip() {
        for role in [MessageRole::User, MessageRole::Assistant] {
            let s = role.to_string();
            let parsed: MessageRole = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_message_role_serde() {
        let role = MessageRole::Assistant;
        let json = serde_json::to_string(&role).unwrap();
        assert_eq!(json, "\"assistant\"");
        let parsed: MessageRole = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, MessageRole::Assistant);
    }

    #[test]
    fn test_message_role_rejects_system() {
        // Only user/assistant rows are persisted; system text is composed
        // per-request and never stored.
        assert!("system".parse::<MessageRole>().is_err());
    }

    #[test]
    fn test_title_short_content_kept_verbatim() {
        assert_eq!(
            Conversation::title_from_first_message("Merhaba"),
            "Merhaba"
        );
    }

    #[test]
    fn test_title_long_content_truncated_with_ellipsis() {
        let content = "x".repeat(80);
        let title = Conversation::title_from_first_message(&content);
        assert_eq!(title, format!("{}...", "x".repeat(50)));
    }

    #[test]
    fn test_title_exactly_fifty_chars_not_truncated() {
        let content = "y".repeat(50);
        assert_eq!(Conversation::title_from_first_message(&content), content);
    }

    #[test]
    fn test_title_truncation_counts_chars_not_bytes() {
        // 60 multi-byte characters; byte-indexed slicing would panic or
        // split mid-character.
        let content = "ş".repeat(60);
        let title = Conversation::title_from_first_message(&content);
        assert_eq!(title.chars().count(), 53);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn test_transcript_projection_drops_metadata() {
        let msg = ChatMessage {
            id: 7,
            conversation_id: "c1".to_string(),
            role: MessageRole::Assistant,
            content: "Hi there".to_string(),
            response_time: Some(2),
            created_at: Utc::now(),
        };
        let projected = Message::from(&msg);
        let json = serde_json::to_string(&projected).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"Hi there"}"#);
    }

    #[test]
    fn test_new_message_constructors() {
        let user = NewMessage::user("Hello");
        assert_eq!(user.role, MessageRole::User);
        assert!(user.response_time.is_none());

        let assistant = NewMessage::assistant("Hi", 3);
        assert_eq!(assistant.role, MessageRole::Assistant);
        assert_eq!(assistant.response_time, Some(3));
    }
}

//! ConversationStore trait definition.
//!
//! Provides CRUD operations for conversations, messages, and XP records.
//! Each operation runs in its own transaction: it succeeds completely or
//! leaves the store untouched.

use sohbet_types::bot::XpRecord;
use sohbet_types::chat::{ChatMessage, Conversation, ConversationPreview, Message, NewMessage};
use sohbet_types::error::StoreError;

/// Store trait for conversation and message persistence.
///
/// Implementations live in sohbet-infra (e.g., `SqliteStore`,
/// `PostgresStore`). Uses native async fn in traits (RPITIT, Rust 2024
/// edition).
pub trait ConversationStore: Send + Sync {
    /// Create a conversation with a caller-supplied id.
    ///
    /// `title` defaults to "New Chat" and `bot_id` to the default persona.
    /// Fails with [`StoreError::Conflict`] if the id already exists.
    fn create_conversation(
        &self,
        id: &str,
        title: Option<&str>,
        bot_id: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Conversation, StoreError>> + Send;

    /// Get a conversation by its id.
    fn get_conversation(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, StoreError>> + Send;

    /// List conversations for a bot, most-recently-active first, each
    /// annotated with the content of its most recent message.
    fn list_conversations(
        &self,
        bot_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<ConversationPreview>, StoreError>> + Send;

    /// Replace a conversation's title and refresh `updated_at`.
    ///
    /// Fails with [`StoreError::NotFound`] if the conversation does not
    /// exist.
    fn update_title(
        &self,
        id: &str,
        title: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Refresh a conversation's `updated_at` without other changes.
    fn touch(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Delete a conversation and all its messages. Deleting an id that
    /// does not exist is not an error.
    fn delete_conversation(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Append a message, creating the conversation first if it does not
    /// exist (with `bot_id` as its owner).
    ///
    /// Refreshes the conversation's `updated_at`. If this is the first
    /// message in the conversation and its role is "user", the message
    /// content becomes the conversation title (truncated to 50 characters
    /// plus an ellipsis when longer). Returns the stored row with its
    /// assigned id.
    fn append_message(
        &self,
        conversation_id: &str,
        bot_id: &str,
        message: &NewMessage,
    ) -> impl std::future::Future<Output = Result<ChatMessage, StoreError>> + Send;

    /// Get all messages for a conversation, ascending by `created_at`
    /// with the assigned id as tie-break.
    fn list_messages(
        &self,
        conversation_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, StoreError>> + Send;

    /// Delete all messages for a conversation, conversation row untouched.
    fn clear_messages(
        &self,
        conversation_id: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Delete a single message by its assigned id. Used to undo a user
    /// turn after an upstream failure without disturbing earlier rows.
    ///
    /// Fails with [`StoreError::NotFound`] if no such message exists.
    fn delete_message(
        &self,
        message_id: i64,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Get a conversation's messages projected to `{role, content}`
    /// pairs, in order, suitable as upstream conversation context.
    fn api_history(
        &self,
        conversation_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, StoreError>> + Send;

    /// Get the XP record for a bot. Bots that were never granted points
    /// report zero points at level 1.
    fn get_xp(
        &self,
        bot_id: &str,
    ) -> impl std::future::Future<Output = Result<XpRecord, StoreError>> + Send;

    /// Add points to a bot's XP record and return the updated record.
    /// The level is recomputed from the new total.
    fn add_xp(
        &self,
        bot_id: &str,
        amount: i64,
    ) -> impl std::future::Future<Output = Result<XpRecord, StoreError>> + Send;
}

//! Chat service orchestrating conversation turns.
//!
//! ChatService coordinates the ConversationStore, the CompletionClient,
//! and the BotRegistry to drive a chat turn end to end: validate input,
//! persist the user turn, call upstream, persist the reply -- and undo
//! the user turn when upstream fails.

use sohbet_types::bot::XpRecord;
use sohbet_types::chat::{ChatMessage, ChatReply, Conversation, ConversationPreview, NewMessage};
use sohbet_types::error::{ChatError, StoreError};
use tracing::{info, warn};

use crate::chat::store::ConversationStore;
use crate::completion::CompletionClient;
use crate::registry::BotRegistry;
use crate::summary;

/// Orchestrates chat turns, conversation management, and XP grants.
///
/// Generic over `ConversationStore` and `CompletionClient` to maintain
/// clean architecture (sohbet-core never depends on sohbet-infra). The
/// client is `None` when no upstream credential was configured; chat and
/// summarize operations then fail fast with a config error instead of
/// attempting a call.
pub struct ChatService<S: ConversationStore, C: CompletionClient> {
    store: S,
    client: Option<C>,
    registry: BotRegistry,
}

impl<S: ConversationStore, C: CompletionClient> ChatService<S, C> {
    /// Create a new chat service.
    pub fn new(store: S, client: Option<C>, registry: BotRegistry) -> Self {
        Self {
            store,
            client,
            registry,
        }
    }

    /// Access the conversation store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Access the persona registry.
    pub fn registry(&self) -> &BotRegistry {
        &self.registry
    }

    // --- Chat turn ---

    /// Run one chat turn: persist the user message, forward the full
    /// conversation history upstream, persist and return the reply.
    ///
    /// Validation failures (unknown bot, unconfigured prompt, empty
    /// message, missing credential) are reported before anything is
    /// written. When the upstream call fails after the user turn was
    /// committed, that message is deleted again by id, so earlier rows
    /// keep their original timestamps, and the failure is surfaced
    /// unchanged.
    #[tracing::instrument(
        name = "send_message",
        skip(self, message),
        fields(conversation_id = %conversation_id, bot_id = %bot_id)
    )]
    pub async fn send_message(
        &self,
        conversation_id: &str,
        bot_id: &str,
        message: &str,
    ) -> Result<ChatReply, ChatError> {
        let bot = self
            .registry
            .get(bot_id)
            .ok_or_else(|| ChatError::UnknownBot(bot_id.to_string()))?;
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        let prompt = bot
            .prompt
            .as_ref()
            .ok_or_else(|| ChatError::PromptNotConfigured(bot.name.clone()))?;
        let client = self.client.as_ref().ok_or(ChatError::MissingCredential)?;

        let user_turn = self
            .store
            .append_message(conversation_id, bot_id, &NewMessage::user(message))
            .await?;
        let history = self.store.api_history(conversation_id).await?;

        let reply = match client.generate_reply(prompt, &history).await {
            Ok(reply) => reply,
            Err(err) => {
                self.undo_user_turn(conversation_id, user_turn.id).await;
                return Err(err.into());
            }
        };

        let assistant_turn = NewMessage::assistant(reply.text.clone(), reply.elapsed_secs);
        if let Err(err) = self
            .store
            .append_message(conversation_id, bot_id, &assistant_turn)
            .await
        {
            self.undo_user_turn(conversation_id, user_turn.id).await;
            return Err(err.into());
        }

        info!(
            conversation_id = %conversation_id,
            response_time = reply.elapsed_secs,
            "assistant reply persisted"
        );

        Ok(ChatReply {
            text: reply.text,
            conversation_id: conversation_id.to_string(),
            response_time: reply.elapsed_secs,
        })
    }

    /// Delete a just-committed user turn after a failure.
    ///
    /// Best effort: a rollback failure is logged but never masks the
    /// failure that triggered it.
    async fn undo_user_turn(&self, conversation_id: &str, message_id: i64) {
        match self.store.delete_message(message_id).await {
            Ok(()) => info!(
                conversation_id = %conversation_id,
                message_id,
                "user turn rolled back after upstream failure"
            ),
            Err(err) => warn!(
                conversation_id = %conversation_id,
                message_id,
                error = %err,
                "failed to roll back user turn"
            ),
        }
    }

    // --- Summaries ---

    /// Summarize a conversation with the bot's localized template and
    /// return the raw summary text.
    ///
    /// When the response carries the localized summary marker, the
    /// extracted sentence replaces the conversation title; a malformed
    /// response leaves the title untouched.
    #[tracing::instrument(
        name = "summarize_conversation",
        skip(self),
        fields(conversation_id = %conversation_id, bot_id = %bot_id)
    )]
    pub async fn summarize_conversation(
        &self,
        conversation_id: &str,
        bot_id: &str,
    ) -> Result<String, ChatError> {
        let bot = self
            .registry
            .get(bot_id)
            .ok_or_else(|| ChatError::UnknownBot(bot_id.to_string()))?;
        if self.store.get_conversation(conversation_id).await?.is_none() {
            return Err(ChatError::ConversationNotFound(
                conversation_id.to_string(),
            ));
        }

        let history = self.store.api_history(conversation_id).await?;
        if history.is_empty() {
            return Err(ChatError::NothingToSummarize(conversation_id.to_string()));
        }
        let client = self.client.as_ref().ok_or(ChatError::MissingCredential)?;

        let conversation_text: String = history
            .iter()
            .map(|m| format!("{}: {}", m.role, m.content))
            .collect::<Vec<_>>()
            .join("\n\n");

        let template = summary::template_for(bot.locale);
        let summary_text = client
            .summarize(template.instructions, &conversation_text)
            .await?;

        // Title replacement is a side effect of a successful summary,
        // never a reason to fail one.
        if let Some(title) = summary::extract_title(&summary_text, template) {
            match self.store.update_title(conversation_id, &title).await {
                Ok(()) => info!(conversation_id = %conversation_id, "conversation title replaced from summary"),
                Err(err) => warn!(
                    conversation_id = %conversation_id,
                    error = %err,
                    "could not apply summary-derived title"
                ),
            }
        }

        Ok(summary_text)
    }

    // --- Conversation management ---

    /// List a bot's conversations, most-recently-active first.
    pub async fn list_conversations(
        &self,
        bot_id: &str,
    ) -> Result<Vec<ConversationPreview>, ChatError> {
        Ok(self.store.list_conversations(bot_id).await?)
    }

    /// Get a conversation and its ordered messages.
    pub async fn conversation_with_messages(
        &self,
        conversation_id: &str,
    ) -> Result<(Conversation, Vec<ChatMessage>), ChatError> {
        let conversation = self
            .store
            .get_conversation(conversation_id)
            .await?
            .ok_or_else(|| ChatError::ConversationNotFound(conversation_id.to_string()))?;
        let messages = self.store.list_messages(conversation_id).await?;
        Ok((conversation, messages))
    }

    /// Delete a conversation and its messages. Deleting an unknown id is
    /// a no-op.
    pub async fn delete_conversation(&self, conversation_id: &str) -> Result<(), ChatError> {
        Ok(self.store.delete_conversation(conversation_id).await?)
    }

    /// Replace a conversation's title with caller-supplied text.
    pub async fn rename_conversation(
        &self,
        conversation_id: &str,
        title: &str,
    ) -> Result<(), ChatError> {
        if title.trim().is_empty() {
            return Err(ChatError::EmptyTitle);
        }
        match self.store.update_title(conversation_id, title).await {
            Ok(()) => Ok(()),
            Err(StoreError::NotFound) => Err(ChatError::ConversationNotFound(
                conversation_id.to_string(),
            )),
            Err(err) => Err(err.into()),
        }
    }

    /// Delete all messages from a conversation, keeping the row itself.
    pub async fn clear_conversation(&self, conversation_id: &str) -> Result<(), ChatError> {
        Ok(self.store.clear_messages(conversation_id).await?)
    }

    // --- XP ---

    /// Current XP record for a bot.
    pub async fn xp(&self, bot_id: &str) -> Result<XpRecord, ChatError> {
        if !self.registry.contains(bot_id) {
            return Err(ChatError::UnknownBot(bot_id.to_string()));
        }
        Ok(self.store.get_xp(bot_id).await?)
    }

    /// Grant points to a bot and return the updated record. Amounts
    /// below 1 are rejected.
    pub async fn grant_xp(&self, bot_id: &str, amount: i64) -> Result<XpRecord, ChatError> {
        if !self.registry.contains(bot_id) {
            return Err(ChatError::UnknownBot(bot_id.to_string()));
        }
        if amount < 1 {
            return Err(ChatError::NonPositiveXp(amount));
        }
        Ok(self.store.add_xp(bot_id, amount).await?)
    }
}

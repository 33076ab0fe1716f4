//! PostgreSQL implementation of the ConversationStore trait.
//!
//! Mirrors the SQLite store with `$N` placeholders and `RETURNING id` for
//! message inserts. A single shared pool serves reads and writes;
//! PostgreSQL handles concurrent writers on its own.

use crate::store::{format_datetime, parse_datetime};
use chrono::Utc;
use sohbet_core::chat::store::ConversationStore;
use sohbet_types::bot::{DEFAULT_BOT_ID, XpRecord};
use sohbet_types::chat::{
    ChatMessage, Conversation, ConversationPreview, DEFAULT_TITLE, Message, MessageRole,
    NewMessage,
};
use sohbet_types::error::StoreError;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions};

/// PostgreSQL-backed conversation store.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect to the database at `database_url` and run migrations.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(8)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        sqlx::migrate!("../../migrations/postgres")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self { pool })
    }
}

/// Internal row representation for conversations.
struct ConversationRow {
    id: String,
    bot_id: String,
    title: String,
    created_at: String,
    updated_at: String,
}

impl ConversationRow {
    fn from_row(row: &sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            bot_id: row.try_get("bot_id")?,
            title: row.try_get("title")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_conversation(self) -> Result<Conversation, StoreError> {
        Ok(Conversation {
            id: self.id,
            bot_id: self.bot_id,
            title: self.title,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

/// Internal row representation for messages.
struct MessageRow {
    id: i64,
    conversation_id: String,
    role: String,
    content: String,
    response_time: Option<i64>,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            conversation_id: row.try_get("conversation_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            response_time: row.try_get("response_time")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, StoreError> {
        Ok(ChatMessage {
            id: self.id,
            conversation_id: self.conversation_id,
            role: self
                .role
                .parse::<MessageRole>()
                .map_err(StoreError::Query)?,
            content: self.content,
            response_time: self.response_time,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

/// Internal row representation for xp_records.
struct XpRow {
    bot_id: String,
    xp: i64,
    level: i64,
    updated_at: String,
}

impl XpRow {
    fn from_row(row: &sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            bot_id: row.try_get("bot_id")?,
            xp: row.try_get("xp")?,
            level: row.try_get("level")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_record(self) -> Result<XpRecord, StoreError> {
        Ok(XpRecord {
            bot_id: self.bot_id,
            xp: self.xp,
            level: self.level,
            updated_at: Some(parse_datetime(&self.updated_at)?),
        })
    }
}

impl ConversationStore for PostgresStore {
    async fn create_conversation(
        &self,
        id: &str,
        title: Option<&str>,
        bot_id: Option<&str>,
    ) -> Result<Conversation, StoreError> {
        let now = Utc::now();
        let stamp = format_datetime(&now);
        let title = title.unwrap_or(DEFAULT_TITLE);
        let bot_id = bot_id.unwrap_or(DEFAULT_BOT_ID);

        sqlx::query(
            "INSERT INTO conversations (id, bot_id, title, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(bot_id)
        .bind(title)
        .bind(&stamp)
        .bind(&stamp)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Conflict(format!("conversation '{id}' already exists"))
            }
            _ => StoreError::Query(e.to_string()),
        })?;

        Ok(Conversation {
            id: id.to_string(),
            bot_id: bot_id.to_string(),
            title: title.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_conversation(&self, id: &str) -> Result<Option<Conversation>, StoreError> {
        let row = sqlx::query(
            "SELECT id, bot_id, title, created_at, updated_at FROM conversations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let parsed = ConversationRow::from_row(&row)
                    .map_err(|e| StoreError::Query(e.to_string()))?;
                Ok(Some(parsed.into_conversation()?))
            }
            None => Ok(None),
        }
    }

    async fn list_conversations(
        &self,
        bot_id: &str,
    ) -> Result<Vec<ConversationPreview>, StoreError> {
        let rows = sqlx::query(
            "SELECT c.id, c.bot_id, c.title, c.created_at, c.updated_at, \
             (SELECT m.content FROM messages m WHERE m.conversation_id = c.id \
              ORDER BY m.created_at DESC, m.id DESC LIMIT 1) AS last_message \
             FROM conversations c WHERE c.bot_id = $1 ORDER BY c.updated_at DESC",
        )
        .bind(bot_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                let conversation = ConversationRow::from_row(row)
                    .map_err(|e| StoreError::Query(e.to_string()))?
                    .into_conversation()?;
                let last_message: Option<String> = row
                    .try_get("last_message")
                    .map_err(|e| StoreError::Query(e.to_string()))?;
                Ok(ConversationPreview {
                    id: conversation.id,
                    bot_id: conversation.bot_id,
                    title: conversation.title,
                    created_at: conversation.created_at,
                    updated_at: conversation.updated_at,
                    last_message,
                })
            })
            .collect()
    }

    async fn update_title(&self, id: &str, title: &str) -> Result<(), StoreError> {
        let stamp = format_datetime(&Utc::now());
        let result =
            sqlx::query("UPDATE conversations SET title = $1, updated_at = $2 WHERE id = $3")
                .bind(title)
                .bind(&stamp)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn touch(&self, id: &str) -> Result<(), StoreError> {
        let stamp = format_datetime(&Utc::now());
        sqlx::query("UPDATE conversations SET updated_at = $1 WHERE id = $2")
            .bind(&stamp)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        Ok(())
    }

    async fn delete_conversation(&self, id: &str) -> Result<(), StoreError> {
        // Messages go with it via ON DELETE CASCADE
        sqlx::query("DELETE FROM conversations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        Ok(())
    }

    async fn append_message(
        &self,
        conversation_id: &str,
        bot_id: &str,
        message: &NewMessage,
    ) -> Result<ChatMessage, StoreError> {
        let now = Utc::now();
        let stamp = format_datetime(&now);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        // An existing conversation keeps its owner and title
        sqlx::query(
            "INSERT INTO conversations (id, bot_id, title, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5) ON CONFLICT (id) DO NOTHING",
        )
        .bind(conversation_id)
        .bind(bot_id)
        .bind(DEFAULT_TITLE)
        .bind(&stamp)
        .bind(&stamp)
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        let inserted = sqlx::query(
            "INSERT INTO messages (conversation_id, role, content, response_time, created_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(conversation_id)
        .bind(message.role.to_string())
        .bind(&message.content)
        .bind(message.response_time)
        .bind(&stamp)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;
        let message_id: i64 = inserted
            .try_get("id")
            .map_err(|e| StoreError::Query(e.to_string()))?;

        sqlx::query("UPDATE conversations SET updated_at = $1 WHERE id = $2")
            .bind(&stamp)
            .bind(conversation_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        if message.role == MessageRole::User {
            let count_row =
                sqlx::query("SELECT COUNT(*) AS cnt FROM messages WHERE conversation_id = $1")
                    .bind(conversation_id)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(|e| StoreError::Query(e.to_string()))?;
            let count: i64 = count_row
                .try_get("cnt")
                .map_err(|e| StoreError::Query(e.to_string()))?;
            if count == 1 {
                let title = Conversation::title_from_first_message(&message.content);
                sqlx::query("UPDATE conversations SET title = $1 WHERE id = $2")
                    .bind(&title)
                    .bind(conversation_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| StoreError::Query(e.to_string()))?;
            }
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(ChatMessage {
            id: message_id,
            conversation_id: conversation_id.to_string(),
            role: message.role,
            content: message.content.clone(),
            response_time: message.response_time,
            created_at: now,
        })
    }

    async fn list_messages(&self, conversation_id: &str) -> Result<Vec<ChatMessage>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, conversation_id, role, content, response_time, created_at \
             FROM messages WHERE conversation_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                MessageRow::from_row(row)
                    .map_err(|e| StoreError::Query(e.to_string()))?
                    .into_message()
            })
            .collect()
    }

    async fn clear_messages(&self, conversation_id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM messages WHERE conversation_id = $1")
            .bind(conversation_id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        Ok(())
    }

    async fn delete_message(&self, message_id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(message_id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn api_history(&self, conversation_id: &str) -> Result<Vec<Message>, StoreError> {
        let rows = sqlx::query(
            "SELECT role, content FROM messages WHERE conversation_id = $1 \
             ORDER BY created_at ASC, id ASC",
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                let role: String = row
                    .try_get("role")
                    .map_err(|e| StoreError::Query(e.to_string()))?;
                let content: String = row
                    .try_get("content")
                    .map_err(|e| StoreError::Query(e.to_string()))?;
                Ok(Message {
                    role: role.parse::<MessageRole>().map_err(StoreError::Query)?,
                    content,
                })
            })
            .collect()
    }

    async fn get_xp(&self, bot_id: &str) -> Result<XpRecord, StoreError> {
        let row =
            sqlx::query("SELECT bot_id, xp, level, updated_at FROM xp_records WHERE bot_id = $1")
                .bind(bot_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| StoreError::Query(e.to_string()))?;

        match row {
            Some(row) => XpRow::from_row(&row)
                .map_err(|e| StoreError::Query(e.to_string()))?
                .into_record(),
            None => Ok(XpRecord::fresh(bot_id)),
        }
    }

    async fn add_xp(&self, bot_id: &str, amount: i64) -> Result<XpRecord, StoreError> {
        let now = Utc::now();
        let stamp = format_datetime(&now);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let current: Option<i64> = sqlx::query("SELECT xp FROM xp_records WHERE bot_id = $1")
            .bind(bot_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?
            .map(|row| row.try_get("xp"))
            .transpose()
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let xp = current.unwrap_or(0) + amount;
        let level = XpRecord::level_for(xp);

        sqlx::query(
            "INSERT INTO xp_records (bot_id, xp, level, updated_at) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (bot_id) DO UPDATE SET xp = excluded.xp, level = excluded.level, \
             updated_at = excluded.updated_at",
        )
        .bind(bot_id)
        .bind(xp)
        .bind(level)
        .bind(&stamp)
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(XpRecord {
            bot_id: bot_id.to_string(),
            xp,
            level,
            updated_at: Some(now),
        })
    }
}

//! Application state shared across HTTP handlers.

use std::sync::Arc;

use secrecy::SecretString;

use sohbet_core::chat::service::ChatService;
use sohbet_core::registry::BotRegistry;
use sohbet_infra::openai::OpenAiClient;
use sohbet_infra::store::{StorageConfig, Store};

use crate::settings::Settings;

/// Chat service pinned to the runtime store and the OpenAI client.
pub type AppChatService = ChatService<Store, OpenAiClient>;

/// Shared application state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<AppChatService>,
}

// Manual impl; a derive would require Debug on the inner client, which
// intentionally has none because it holds the API key.
impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    /// Connect storage, run migrations, and wire up the chat service.
    ///
    /// The completion client is only constructed when an API key is
    /// configured; without one the server still answers conversation
    /// management and XP requests.
    pub async fn init(settings: &Settings) -> anyhow::Result<Self> {
        let database_url = match &settings.database_url {
            Some(url) => url.clone(),
            None => {
                let data_dir = settings.resolve_data_dir();
                tokio::fs::create_dir_all(&data_dir).await?;
                format!("sqlite://{}", data_dir.join("sohbet.db").display())
            }
        };

        let config = StorageConfig::from_url(&database_url)?;
        let store = Store::connect(config).await?;

        let client = settings
            .openai_api_key
            .clone()
            .map(|key| OpenAiClient::new(SecretString::from(key), settings.summary_model.clone()));
        if client.is_none() {
            tracing::warn!(
                "OPENAI_API_KEY is not set; chat and summarize will report a configuration error"
            );
        }

        let registry = BotRegistry::builtin();
        tracing::info!(bots = registry.len(), "persona registry loaded");

        Ok(Self {
            chat: Arc::new(ChatService::new(store, client, registry)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    fn test_settings(database_url: Option<String>, data_dir: Option<PathBuf>) -> Settings {
        Settings {
            port: 0,
            host: "127.0.0.1".to_string(),
            openai_api_key: None,
            database_url,
            data_dir,
            debug: false,
            otel: false,
            summary_model: "gpt-4o-mini".to_string(),
        }
    }

    #[tokio::test]
    async fn test_init_with_explicit_sqlite_url() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("api.db").display());

        let state = AppState::init(&test_settings(Some(url), None)).await.unwrap();
        let conversations = state.chat.list_conversations("meliksah").await.unwrap();
        assert!(conversations.is_empty());

        // Leak the tempdir so the database file outlives the pools.
        std::mem::forget(dir);
    }

    #[tokio::test]
    async fn test_init_creates_data_dir_for_default_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("nested");

        let state = AppState::init(&test_settings(None, Some(data_dir.clone())))
            .await
            .unwrap();
        // A write proves the schema is in place.
        state.chat.clear_conversation("warmup").await.unwrap();
        assert!(data_dir.join("sohbet.db").exists());

        std::mem::forget(dir);
    }

    #[tokio::test]
    async fn test_init_rejects_unsupported_database_url() {
        let err = AppState::init(&test_settings(Some("mysql://nope".to_string()), None))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("unsupported database URL"));
    }
}

use thiserror::Error;

/// Errors from conversation store operations (used by the trait
/// definition in sohbet-core).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("unsupported database URL: {0}")]
    UnsupportedUrl(String),
}

/// Errors from the upstream completion service.
///
/// Each variant keeps the raw diagnostic text from the wire; the HTTP
/// layer decides what of it reaches the client.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("authentication rejected by completion service")]
    Auth { raw: String },

    #[error("rate limited by completion service")]
    RateLimited { raw: String },

    #[error("could not reach completion service: {raw}")]
    Connection { raw: String },

    #[error("completion service returned status {status}: {message}")]
    Api {
        status: u16,
        /// Short message parsed from the error envelope when possible.
        message: String,
        raw: String,
    },

    #[error("unexpected completion payload: {0}")]
    Deserialization(String),
}

/// Errors from the chat orchestrator.
///
/// Validation and configuration variants are raised before any side
/// effect; `Upstream` is raised after the user turn was persisted (and
/// rolled back).
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("bot '{0}' not found")]
    UnknownBot(String),

    #[error("message must not be empty")]
    EmptyMessage,

    #[error("title must not be empty")]
    EmptyTitle,

    #[error("no upstream prompt configured for bot '{0}'")]
    PromptNotConfigured(String),

    #[error("completion credential is not configured")]
    MissingCredential,

    #[error("conversation '{0}' not found")]
    ConversationNotFound(String),

    #[error("conversation '{0}' has no messages to summarize")]
    NothingToSummarize(String),

    #[error("xp amount must be positive, got {0}")]
    NonPositiveXp(i64),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_upstream_error_display() {
        let err = UpstreamError::Api {
            status: 502,
            message: "bad gateway".to_string(),
            raw: "{\"error\":{\"message\":\"bad gateway\"}}".to_string(),
        };
        assert!(err.to_string().contains("502"));
        assert!(err.to_string().contains("bad gateway"));
    }

    #[test]
    fn test_chat_error_display() {
        let err = ChatError::UnknownBot("ghost".to_string());
        assert_eq!(err.to_string(), "bot 'ghost' not found");
    }

    #[test]
    fn test_chat_error_wraps_store_error_transparently() {
        let err = ChatError::from(StoreError::NotFound);
        assert_eq!(err.to_string(), "entity not found");
    }
}

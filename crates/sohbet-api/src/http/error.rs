//! Application error type mapping to HTTP status codes and envelope format.
//!
//! Typed failures serialize as `{error, error_type, details}` plus an
//! optional `raw_error` carrying upstream diagnostic text. Not-found
//! responses carry only the `error` field.

use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use sohbet_types::error::{ChatError, StoreError, UpstreamError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub struct AppError(pub ChatError);

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, error_type, details, raw_error) = match self.0 {
            ChatError::UnknownBot(bot_id) => (
                StatusCode::BAD_REQUEST,
                "Invalid bot",
                "validation_error",
                format!("Bot \"{bot_id}\" not found."),
                None,
            ),
            ChatError::EmptyMessage => (
                StatusCode::BAD_REQUEST,
                "No message provided",
                "validation_error",
                "Please enter a message before sending.".to_string(),
                None,
            ),
            ChatError::EmptyTitle => (
                StatusCode::BAD_REQUEST,
                "No title provided",
                "validation_error",
                "Please enter a title before saving.".to_string(),
                None,
            ),
            ChatError::PromptNotConfigured(name) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Bot not configured",
                "config_error",
                format!("{name} prompt is not configured yet."),
                None,
            ),
            ChatError::MissingCredential => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "API key not configured",
                "config_error",
                "OpenAI API key is missing. Please add OPENAI_API_KEY environment variable."
                    .to_string(),
                None,
            ),
            ChatError::NothingToSummarize(_) => (
                StatusCode::BAD_REQUEST,
                "No messages to summarize",
                "validation_error",
                "This conversation does not have any messages yet.".to_string(),
                None,
            ),
            ChatError::NonPositiveXp(amount) => (
                StatusCode::BAD_REQUEST,
                "Invalid XP amount",
                "validation_error",
                format!("XP amount must be at least 1, got {amount}."),
                None,
            ),
            ChatError::ConversationNotFound(_) | ChatError::Store(StoreError::NotFound) => {
                return (
                    StatusCode::NOT_FOUND,
                    [(CONTENT_TYPE, "application/json")],
                    json!({ "error": "Conversation not found" }).to_string(),
                )
                    .into_response();
            }
            ChatError::Upstream(UpstreamError::Auth { raw }) => (
                StatusCode::UNAUTHORIZED,
                "Authentication failed",
                "auth_error",
                "Your OpenAI API key is invalid or expired. Please check your API key in the .env file."
                    .to_string(),
                Some(raw),
            ),
            ChatError::Upstream(UpstreamError::RateLimited { raw }) => (
                StatusCode::TOO_MANY_REQUESTS,
                "Rate limit exceeded",
                "rate_limit_error",
                "Too many requests. Please wait a moment and try again. You may have exceeded your OpenAI quota."
                    .to_string(),
                Some(raw),
            ),
            ChatError::Upstream(UpstreamError::Connection { raw }) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Connection failed",
                "connection_error",
                "Could not connect to OpenAI servers. Please check your internet connection."
                    .to_string(),
                Some(raw),
            ),
            ChatError::Upstream(UpstreamError::Api { message, raw, .. }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "OpenAI API error",
                "api_error",
                format!("OpenAI returned an error: {message}"),
                Some(raw),
            ),
            ChatError::Upstream(UpstreamError::Deserialization(msg)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Unexpected error",
                "unknown_error",
                format!("An unexpected error occurred: {msg}"),
                Some(msg),
            ),
            ChatError::Store(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Unexpected error",
                "unknown_error",
                format!("An unexpected error occurred: {e}"),
                Some(e.to_string()),
            ),
        };

        let mut body = json!({
            "error": error,
            "error_type": error_type,
            "details": details,
        });
        if let Some(raw) = raw_error {
            body["raw_error"] = json!(raw);
        }

        (
            status,
            [(CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn wire(err: ChatError) -> (StatusCode, serde_json::Value) {
        let response = AppError::from(err).into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_unknown_bot_maps_to_validation_error() {
        let (status, body) = wire(ChatError::UnknownBot("ghost".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid bot");
        assert_eq!(body["error_type"], "validation_error");
        assert_eq!(body["details"], "Bot \"ghost\" not found.");
        assert!(body.get("raw_error").is_none());
    }

    #[tokio::test]
    async fn test_empty_message_maps_to_validation_error() {
        let (status, body) = wire(ChatError::EmptyMessage).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No message provided");
        assert_eq!(body["details"], "Please enter a message before sending.");
    }

    #[tokio::test]
    async fn test_missing_credential_maps_to_config_error() {
        let (status, body) = wire(ChatError::MissingCredential).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "API key not configured");
        assert_eq!(body["error_type"], "config_error");
        assert_eq!(
            body["details"],
            "OpenAI API key is missing. Please add OPENAI_API_KEY environment variable."
        );
    }

    #[tokio::test]
    async fn test_prompt_not_configured_maps_to_config_error() {
        let (status, body) =
            wire(ChatError::PromptNotConfigured("Taslak Bot".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Bot not configured");
        assert_eq!(body["details"], "Taslak Bot prompt is not configured yet.");
    }

    #[tokio::test]
    async fn test_upstream_failures_map_to_their_statuses() {
        let cases = [
            (
                ChatError::Upstream(UpstreamError::Auth {
                    raw: "boom".to_string(),
                }),
                StatusCode::UNAUTHORIZED,
                "auth_error",
            ),
            (
                ChatError::Upstream(UpstreamError::RateLimited {
                    raw: "boom".to_string(),
                }),
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limit_error",
            ),
            (
                ChatError::Upstream(UpstreamError::Connection {
                    raw: "boom".to_string(),
                }),
                StatusCode::SERVICE_UNAVAILABLE,
                "connection_error",
            ),
        ];
        for (err, expected_status, expected_type) in cases {
            let (status, body) = wire(err).await;
            assert_eq!(status, expected_status);
            assert_eq!(body["error_type"], expected_type);
            assert_eq!(body["raw_error"], "boom");
        }
    }

    #[tokio::test]
    async fn test_api_error_carries_parsed_message() {
        let (status, body) = wire(ChatError::Upstream(UpstreamError::Api {
            status: 502,
            message: "model overloaded".to_string(),
            raw: "{\"error\":{}}".to_string(),
        }))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "OpenAI API error");
        assert_eq!(body["error_type"], "api_error");
        assert_eq!(body["details"], "OpenAI returned an error: model overloaded");
        assert_eq!(body["raw_error"], "{\"error\":{}}");
    }

    #[tokio::test]
    async fn test_store_error_maps_to_unknown_error() {
        let (status, body) =
            wire(ChatError::Store(StoreError::Query("disk I/O error".to_string()))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Unexpected error");
        assert_eq!(body["error_type"], "unknown_error");
        assert_eq!(
            body["details"],
            "An unexpected error occurred: query error: disk I/O error"
        );
    }

    #[tokio::test]
    async fn test_conversation_not_found_has_minimal_body() {
        let (status, body) = wire(ChatError::ConversationNotFound("c1".to_string())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Conversation not found" }));
    }

    #[tokio::test]
    async fn test_xp_amount_maps_to_validation_error() {
        let (status, body) = wire(ChatError::NonPositiveXp(-5)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid XP amount");
        assert_eq!(body["details"], "XP amount must be at least 1, got -5.");
    }
}

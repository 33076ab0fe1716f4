//! OpenAiClient -- concrete [`CompletionClient`] implementation for OpenAI.
//!
//! Persona replies go through the Responses API with a server-side stored
//! prompt; summaries go through the Chat Completions API with an inline
//! system instruction.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and only exposed
//! when the Authorization header is built.

use std::time::{Duration, Instant};

use secrecy::{ExposeSecret, SecretString};

use sohbet_core::completion::{CompletionClient, UpstreamReply};
use sohbet_types::bot::PromptRef;
use sohbet_types::chat::Message;
use sohbet_types::error::UpstreamError;

use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ErrorEnvelope, InputMessage, PromptParam,
    ResponsesRequest, ResponsesResponse,
};

/// Sampling temperature for summary generation.
const SUMMARY_TEMPERATURE: f64 = 0.3;

/// Token cap for summary generation.
const SUMMARY_MAX_TOKENS: u32 = 256;

/// OpenAI-backed completion client.
// No Debug derive; the struct holds the API key.
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    summary_model: String,
}

impl OpenAiClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - OpenAI API key wrapped in SecretString
    /// * `summary_model` - Model identifier for summaries (e.g., "gpt-4o-mini")
    pub fn new(api_key: SecretString, summary_model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300)) // 5 min timeout for long generations
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: "https://api.openai.com".to_string(),
            summary_model,
        }
    }

    /// The model used for summaries.
    pub fn summary_model(&self) -> &str {
        &self.summary_model
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Build the full API URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Convert a prompt reference plus transcript into a [`ResponsesRequest`].
    fn to_responses_request(&self, prompt: &PromptRef, history: &[Message]) -> ResponsesRequest {
        let input = history
            .iter()
            .map(|m| InputMessage {
                role: m.role.to_string(),
                content: m.content.clone(),
            })
            .collect();

        ResponsesRequest {
            prompt: PromptParam {
                id: prompt.id.clone(),
                version: prompt.version.clone(),
            },
            input,
        }
    }
}

/// Map a non-success HTTP status to the matching [`UpstreamError`].
fn classify_status(status: u16, body: String) -> UpstreamError {
    match status {
        401 => UpstreamError::Auth { raw: body },
        429 => UpstreamError::RateLimited { raw: body },
        _ => {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| body.clone());
            UpstreamError::Api {
                status,
                message,
                raw: body,
            }
        }
    }
}

impl CompletionClient for OpenAiClient {
    #[tracing::instrument(
        name = "generate_reply",
        skip(self, history),
        fields(
            gen_ai.operation.name = "chat",
            gen_ai.provider.name = "openai",
            prompt_id = %prompt.id,
            prompt_version = %prompt.version,
            history_len = history.len(),
        )
    )]
    async fn generate_reply(
        &self,
        prompt: &PromptRef,
        history: &[Message],
    ) -> Result<UpstreamReply, UpstreamError> {
        let body = self.to_responses_request(prompt, history);
        let url = self.url("/v1/responses");

        let started = Instant::now();
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| UpstreamError::Connection { raw: e.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(classify_status(status.as_u16(), error_body));
        }

        let parsed: ResponsesResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::Deserialization(format!("failed to parse response: {e}")))?;
        let elapsed_secs = started.elapsed().as_secs() as i64;

        tracing::debug!(
            response_id = %parsed.id,
            elapsed_secs,
            "upstream reply received"
        );

        Ok(UpstreamReply {
            text: parsed.output_text(),
            elapsed_secs,
        })
    }

    #[tracing::instrument(
        name = "summarize",
        skip(self, instructions, conversation_text),
        fields(
            gen_ai.operation.name = "chat",
            gen_ai.provider.name = "openai",
            gen_ai.request.model = %self.summary_model,
        )
    )]
    async fn summarize(
        &self,
        instructions: &str,
        conversation_text: &str,
    ) -> Result<String, UpstreamError> {
        let body = ChatCompletionRequest {
            model: self.summary_model.clone(),
            messages: vec![
                InputMessage {
                    role: "system".to_string(),
                    content: instructions.to_string(),
                },
                InputMessage {
                    role: "user".to_string(),
                    content: conversation_text.to_string(),
                },
            ],
            temperature: SUMMARY_TEMPERATURE,
            max_tokens: SUMMARY_MAX_TOKENS,
        };
        let url = self.url("/v1/chat/completions");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| UpstreamError::Connection { raw: e.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(classify_status(status.as_u16(), error_body));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::Deserialization(format!("failed to parse response: {e}")))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                UpstreamError::Deserialization("completion contained no choices".to_string())
            })?;

        Ok(text.trim().to_string())
    }
}

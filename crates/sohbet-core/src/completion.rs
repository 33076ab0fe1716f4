//! CompletionClient trait definition.
//!
//! This is the port to the upstream completion service. Two call
//! profiles exist: `generate_reply` runs a conversation against a pinned
//! structured prompt, `summarize` runs a free-form instruction over the
//! conversation transcript.

use sohbet_types::bot::PromptRef;
use sohbet_types::chat::Message;
use sohbet_types::error::UpstreamError;

/// A successful reply from the completion service.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    /// Assistant text, ready to persist and return to the client.
    pub text: String,
    /// Wall-clock latency of the upstream call, truncated to whole seconds.
    pub elapsed_secs: i64,
}

/// Trait for the upstream completion service.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// The implementation lives in sohbet-infra (`OpenAiClient`).
pub trait CompletionClient: Send + Sync {
    /// Send the full ordered conversation history plus a prompt reference
    /// and receive the assistant reply.
    fn generate_reply(
        &self,
        prompt: &PromptRef,
        history: &[Message],
    ) -> impl std::future::Future<Output = Result<UpstreamReply, UpstreamError>> + Send;

    /// Run a fixed system instruction over a rendered conversation
    /// transcript and return the raw completion text.
    fn summarize(
        &self,
        instructions: &str,
        conversation_text: &str,
    ) -> impl std::future::Future<Output = Result<String, UpstreamError>> + Send;
}

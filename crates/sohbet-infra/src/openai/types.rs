//! Request/response types for the OpenAI API.
//!
//! Hand-rolled serde types covering exactly the fields Sohbet uses; the
//! deserializers tolerate unknown item and block types so new server-side
//! output kinds do not break parsing.

use serde::{Deserialize, Serialize};

/// Request body for the Responses API (`POST /v1/responses`).
///
/// The persona's instructions live server-side behind the prompt
/// reference; only the conversation transcript travels with the request.
#[derive(Debug, Clone, Serialize)]
pub struct ResponsesRequest {
    pub prompt: PromptParam,
    pub input: Vec<InputMessage>,
}

/// Server-side stored prompt reference (id + pinned version).
#[derive(Debug, Clone, Serialize)]
pub struct PromptParam {
    pub id: String,
    pub version: String,
}

/// One `{role, content}` turn as the API expects it.
#[derive(Debug, Clone, Serialize)]
pub struct InputMessage {
    pub role: String,
    pub content: String,
}

/// Non-streaming response from the Responses API.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponsesResponse {
    pub id: String,
    #[serde(default)]
    pub output: Vec<OutputItem>,
}

impl ResponsesResponse {
    /// Concatenated text of every `output_text` block, in order.
    ///
    /// Mirrors the `output_text` convenience accessor of the official
    /// SDKs: reasoning items and non-text blocks are skipped.
    pub fn output_text(&self) -> String {
        self.output
            .iter()
            .filter_map(|item| match item {
                OutputItem::Message { content } => Some(content),
                OutputItem::Other => None,
            })
            .flatten()
            .filter_map(|block| match block {
                OutputContent::OutputText { text } => Some(text.as_str()),
                OutputContent::Other => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

/// An item in the `output` array of a Responses API response.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum OutputItem {
    #[serde(rename = "message")]
    Message {
        #[serde(default)]
        content: Vec<OutputContent>,
    },
    /// Reasoning items, tool calls, and anything newer than this code.
    #[serde(other)]
    Other,
}

/// A content block inside an output message.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum OutputContent {
    #[serde(rename = "output_text")]
    OutputText { text: String },
    #[serde(other)]
    Other,
}

/// Request body for the Chat Completions API (`POST /v1/chat/completions`).
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<InputMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Response from the Chat Completions API.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

/// Error envelope the API wraps failures in: `{"error": {"message": ...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
}

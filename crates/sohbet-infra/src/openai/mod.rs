//! OpenAI completion provider.
//!
//! Two endpoints are in play: `/v1/responses` with server-side stored
//! prompts for persona replies, and `/v1/chat/completions` for the
//! summarizer.

pub mod client;
pub mod types;

pub use client::OpenAiClient;

//! Conversation persistence abstraction and chat orchestration for Sohbet.
//!
//! This module defines the `ConversationStore` trait that the
//! infrastructure layer implements, and the `ChatService` that drives a
//! chat turn end to end.

pub mod service;
pub mod store;

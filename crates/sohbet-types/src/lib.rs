//! Shared domain types for Sohbet.
//!
//! This crate contains the core domain types used across the Sohbet backend:
//! conversations, messages, bot personas, XP records, and their associated
//! error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod bot;
pub mod chat;
pub mod error;

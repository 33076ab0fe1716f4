//! Business logic and store trait definitions for Sohbet.
//!
//! This crate defines the "ports" (the conversation store and the
//! completion client traits) that the infrastructure layer implements.
//! It depends only on `sohbet-types` -- never on `sohbet-infra` or any
//! database/IO crate.

pub mod chat;
pub mod completion;
pub mod registry;
pub mod summary;

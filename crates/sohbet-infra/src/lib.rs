//! Infrastructure layer for Sohbet.
//!
//! Concrete implementations of the ports defined in sohbet-core: SQL
//! conversation persistence (SQLite and PostgreSQL) and the OpenAI
//! completion client.

pub mod openai;
pub mod store;

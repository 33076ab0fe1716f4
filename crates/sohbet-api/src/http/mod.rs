//! HTTP/REST API layer for Sohbet.
//!
//! Axum-based REST API at `/api/` with the flat JSON error envelope the
//! web client expects, plus CORS support.

pub mod error;
pub mod handlers;
pub mod router;

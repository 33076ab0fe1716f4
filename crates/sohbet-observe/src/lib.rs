//! Observability plumbing for Sohbet: tracing subscriber setup and
//! optional OpenTelemetry span export.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, shutdown_tracing};

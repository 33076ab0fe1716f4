//! Runtime settings for the `sohbet` binary.
//!
//! Uses clap derive macros with environment fallbacks, so the server is
//! equally configurable from the command line and from a container
//! environment.

use std::path::PathBuf;

use clap::Parser;

/// Multi-persona chat backend for the Sohbet web client.
#[derive(Debug, Parser)]
#[command(name = "sohbet", version, about, long_about = None)]
pub struct Settings {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Address to bind.
    #[arg(long, env = "SOHBET_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// OpenAI API key. When absent the server still starts, but chat and
    /// summarize requests report a configuration error.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Database URL (`sqlite://...` or `postgres://...`). Defaults to a
    /// SQLite database under the data directory.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Directory holding the default SQLite database.
    #[arg(long, env = "SOHBET_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Raise the default log filter from info to debug.
    #[arg(long, env = "SOHBET_DEBUG")]
    pub debug: bool,

    /// Export spans through the OpenTelemetry stdout exporter.
    #[arg(long, env = "SOHBET_OTEL")]
    pub otel: bool,

    /// Model used for conversation summaries.
    #[arg(long, env = "SOHBET_SUMMARY_MODEL", default_value = "gpt-4o-mini")]
    pub summary_model: String,
}

impl Settings {
    /// Data directory for the default SQLite database: `--data-dir`,
    /// `SOHBET_DATA_DIR`, or `~/.sohbet`.
    pub fn resolve_data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => dir.clone(),
            None => {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".sohbet")
            }
        }
    }

    /// Default log filter directive, overridable via `RUST_LOG`.
    pub fn log_filter(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }
}

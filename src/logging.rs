//! Logging initialization
//!
//! Sets up the `tracing` subscriber used by the `stable-match` binary. The
//! library itself only emits events and never installs a subscriber.
//!
//! ## Output Streams
//!
//! Every format writes to stderr. Stdout belongs to the run's result: the
//! `Matches:` table, or the JSON report when `--json` is given, so the
//! report can be piped into `jq` while progress logs stay on the terminal.
//! `--log-format json` only changes the shape of the log lines on stderr.
//!
//! ## Levels
//!
//! Controlled via `RUST_LOG`, defaulting to `info`. At `info` a run logs the
//! generation and matching summaries; `debug` adds one event per generated
//! entity and per accepted proposal; `trace` adds every rejection.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    #[default]
    Pretty,
    /// JSON format for structured logging
    Json,
    /// Compact format
    Compact,
}

impl LogFormat {
    /// Parse from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            "compact" => Some(Self::Compact),
            _ => None,
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown log format: {}", s))
    }
}

/// Install the global subscriber.
///
/// Logs go to stderr so stdout stays clean for `--json` output.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(format: LogFormat) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_thread_ids(false)
                        .with_ansi(true),
                )
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init()?;
        }
        LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .try_init()?;
        }
    }

    tracing::debug!(format = ?format, "Logging initialized");
    Ok(())
}

// src/observability/mod.rs
//! Logging and metrics
//!
//! - **Tracing**: `tracing-subscriber` fmt output filtered by `RUST_LOG`,
//!   either human-readable or one JSON object per log line
//! - **Metrics**: counters through the `metrics` facade; they are no-ops until
//!   the host installs a metrics recorder

use crate::utils::errors::{RecorderError, Result};
use tracing_subscriber::EnvFilter;

/// Counter: sessions opened
pub const SESSIONS_STARTED: &str = "recorder_sessions_started_total";

/// Counter: sessions closed
pub const SESSIONS_STOPPED: &str = "recorder_sessions_stopped_total";

/// Counter: data lines written, labeled by `event`
pub const EVENTS_WRITTEN: &str = "recorder_events_written_total";

/// Counter: data lines dropped at the session cap
pub const EVENTS_DROPPED: &str = "recorder_events_dropped_total";

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable single-line output
    #[default]
    Text,

    /// Structured JSON, one object per line
    Json,
}

impl LogFormat {
    /// Parse from `text`/`json` (case-insensitive)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" | "plain" => Some(LogFormat::Text),
            "json" | "jsonl" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

/// Install the global tracing subscriber
pub fn init_tracing(format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().with_current_span(false).try_init(),
    };

    installed.map_err(|e| RecorderError::Observability(format!("tracing init failed: {}", e)))
}

pub(crate) fn session_started() {
    metrics::counter!(SESSIONS_STARTED).increment(1);
}

pub(crate) fn session_stopped() {
    metrics::counter!(SESSIONS_STOPPED).increment(1);
}

pub(crate) fn event_written(event: &'static str) {
    metrics::counter!(EVENTS_WRITTEN, "event" => event).increment(1);
}

pub(crate) fn event_dropped() {
    metrics::counter!(EVENTS_DROPPED).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse(" JSON "), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("text"), Some(LogFormat::Text));
        assert_eq!(LogFormat::parse("yaml"), None);
        assert_eq!(LogFormat::default(), LogFormat::Text);
    }

    #[test]
    fn test_counters_without_recorder_are_noops() {
        session_started();
        event_written("damage");
        event_dropped();
        session_stopped();
    }
}

// src/utils/errors.rs
//! Error types for the event recorder
//!
//! Lifecycle operations (start, stop, config loading) report failures through
//! [`RecorderError`]. The recording path never returns errors to the host; it
//! logs them and drops the event.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for recorder operations
pub type Result<T> = std::result::Result<T, RecorderError>;

/// Main error type for the recorder
#[derive(Error, Debug)]
pub enum RecorderError {
    /// Recording is switched off in the configuration snapshot
    #[error("event recorder is disabled")]
    Disabled,

    /// A session is already open
    #[error("a recording session is already active: '{0}'")]
    AlreadyActive(String),

    /// No session is open
    #[error("no active recording session")]
    NotActive,

    #[error("invalid session name: {0}")]
    InvalidSessionName(String),

    #[error("failed to create output directory {path:?}: {source}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open output file {path:?}: {source}")]
    OutputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write event: {0}")]
    Write(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("configuration error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("observability setup failed: {0}")]
    Observability(String),
}

impl RecorderError {
    /// Directory or file failures raised while opening a session
    pub fn is_resource_failure(&self) -> bool {
        matches!(
            self,
            RecorderError::OutputDirectory { .. }
                | RecorderError::OutputFile { .. }
                | RecorderError::Write(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_wording() {
        assert!(RecorderError::Disabled.to_string().contains("disabled"));
        assert!(RecorderError::AlreadyActive("boss1".into())
            .to_string()
            .contains("already active"));
        assert_eq!(RecorderError::NotActive.to_string(), "no active recording session");

        let err = RecorderError::OutputFile {
            path: PathBuf::from("recordings/boss1.jsonl"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("failed to open output"));
    }

    #[test]
    fn test_classification() {
        let err = RecorderError::OutputDirectory {
            path: PathBuf::from("/nope"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "boom"),
        };
        assert!(err.is_resource_failure());
        assert!(!RecorderError::Disabled.is_resource_failure());
    }
}

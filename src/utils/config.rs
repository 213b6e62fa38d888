// src/utils/config.rs
//! Recorder configuration
//!
//! The controller only ever sees a resolved [`RecorderConfig`] snapshot.
//! Loading layers, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. Optional TOML file (`enable`, `output_dir`, `max_events`, `default_radius`)
//! 3. Environment variables prefixed `EVENT_RECORDER_` (e.g. `EVENT_RECORDER_ENABLE=1`)

use crate::utils::errors::{RecorderError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "EVENT_RECORDER";

/// Resolved recorder configuration snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Gates every lifecycle and recording operation
    pub enable: bool,

    /// Directory receiving session files (created on demand)
    pub output_dir: PathBuf,

    /// Hard cap of data events per session
    pub max_events: u32,

    /// Radius used when a session start does not give one (0 = unrestricted)
    pub default_radius: f32,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            enable: false,
            output_dir: PathBuf::from("recordings"),
            max_events: 100_000,
            default_radius: 0.0,
        }
    }
}

impl RecorderConfig {
    /// Load configuration from defaults, an optional file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();
        let mut builder = config::Config::builder()
            .set_default("enable", defaults.enable)?
            .set_default("output_dir", defaults.output_dir.to_string_lossy().into_owned())?
            .set_default("max_events", i64::from(defaults.max_events))?
            .set_default("default_radius", f64::from(defaults.default_radius))?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let loaded: RecorderConfig = settings.try_deserialize()?;
        loaded.validate()?;

        if loaded.enable {
            info!(
                "Event recorder enabled (output: {:?}, max events: {})",
                loaded.output_dir, loaded.max_events
            );
        }

        Ok(loaded)
    }

    /// Enabled configuration writing into `output_dir`
    pub fn enabled(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            enable: true,
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_max_events(mut self, max_events: u32) -> Self {
        self.max_events = max_events;
        self
    }

    pub fn with_default_radius(mut self, radius: f32) -> Self {
        self.default_radius = radius;
        self
    }

    /// Validate the snapshot
    pub fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(RecorderError::Config("output_dir cannot be empty".to_string()));
        }

        if !self.default_radius.is_finite() || self.default_radius < 0.0 {
            return Err(RecorderError::Config(format!(
                "default_radius must be a finite non-negative number, got {}",
                self.default_radius
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = RecorderConfig::default();
        assert!(!config.enable);
        assert_eq!(config.output_dir, PathBuf::from("recordings"));
        assert_eq!(config.max_events, 100_000);
        assert_eq!(config.default_radius, 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("recorder.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "enable = true").unwrap();
        writeln!(file, "output_dir = \"captures\"").unwrap();
        writeln!(file, "max_events = 250").unwrap();
        writeln!(file, "default_radius = 40.5").unwrap();
        drop(file);

        let config = RecorderConfig::load(Some(&path)).unwrap();
        assert!(config.enable);
        assert_eq!(config.output_dir, PathBuf::from("captures"));
        assert_eq!(config.max_events, 250);
        assert_eq!(config.default_radius, 40.5);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("recorder.toml");
        std::fs::write(&path, "enable = true\n").unwrap();

        let config = RecorderConfig::load(Some(&path)).unwrap();
        assert!(config.enable);
        assert_eq!(config.max_events, 100_000);
        assert_eq!(config.output_dir, PathBuf::from("recordings"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let result = RecorderConfig::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(RecorderError::ConfigSource(_))));
    }

    #[test]
    fn test_validation() {
        let negative = RecorderConfig::default().with_default_radius(-1.0);
        assert!(negative.validate().is_err());

        let nan = RecorderConfig::default().with_default_radius(f32::NAN);
        assert!(nan.validate().is_err());

        let empty_dir = RecorderConfig {
            output_dir: PathBuf::new(),
            ..Default::default()
        };
        assert!(empty_dir.validate().is_err());
    }
}

// src/console/mod.rs
//! Operator console
//!
//! Parses `record start|stop|status` lines and runs them against a
//! [`SessionController`], answering with plain text lines.
//!
//! ```text
//! record start <session-name> [--map <mapId>] [--radius <float>]
//! record stop
//! record status
//! ```

use crate::recording::controller::SessionController;
use crate::world::Unit;
use thiserror::Error;

pub const USAGE: &str = "Usage: record start <session-name> [--map <mapId>] [--radius <float>]";

/// A parsed console command
#[derive(Debug, Clone, PartialEq)]
pub enum RecordCommand {
    Start {
        name: String,
        map_filter: u32,
        radius: f32,
    },
    Stop,
    Status,
}

/// Command parse failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("{}", USAGE)]
    MissingName,

    #[error("Invalid map ID: {0}")]
    InvalidMap(String),

    #[error("Invalid radius: {0}")]
    InvalidRadius(String),

    #[error("Unknown command '{0}'. Available: record start | record stop | record status")]
    Unknown(String),
}

impl RecordCommand {
    /// Parse one console line; the leading `record`/`.record` is optional
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut tokens = line.split_whitespace().peekable();

        if matches!(tokens.peek(), Some(&"record") | Some(&".record")) {
            tokens.next();
        }

        match tokens.next() {
            Some("start") => {
                let name = tokens.next().ok_or(CommandError::MissingName)?.to_string();
                let mut map_filter = 0;
                let mut radius = 0.0;

                // Unknown tokens and flags without a value are ignored
                while let Some(token) = tokens.next() {
                    match token {
                        "--map" => {
                            if let Some(value) = tokens.next() {
                                map_filter = value
                                    .parse::<u32>()
                                    .map_err(|_| CommandError::InvalidMap(value.to_string()))?;
                            }
                        }
                        "--radius" => {
                            if let Some(value) = tokens.next() {
                                radius = value
                                    .parse::<f32>()
                                    .ok()
                                    .filter(|r| r.is_finite() && *r >= 0.0)
                                    .ok_or_else(|| CommandError::InvalidRadius(value.to_string()))?;
                            }
                        }
                        _ => {}
                    }
                }

                Ok(RecordCommand::Start {
                    name,
                    map_filter,
                    radius,
                })
            }
            Some("stop") => Ok(RecordCommand::Stop),
            Some("status") => Ok(RecordCommand::Status),
            Some(other) => Err(CommandError::Unknown(other.to_string())),
            None => Err(CommandError::Unknown(String::new())),
        }
    }
}

/// Runs console commands for one operator
pub struct Console<'a> {
    controller: &'a SessionController,
}

impl<'a> Console<'a> {
    pub fn new(controller: &'a SessionController) -> Self {
        Self { controller }
    }

    /// Parse and run `line`; `origin` is the operator's own unit, if any
    pub fn execute(&self, line: &str, origin: Option<&dyn Unit>) -> Vec<String> {
        match RecordCommand::parse(line) {
            Ok(command) => self.run(command, origin),
            Err(e) => vec![e.to_string()],
        }
    }

    pub fn run(&self, command: RecordCommand, origin: Option<&dyn Unit>) -> Vec<String> {
        match command {
            RecordCommand::Start {
                name,
                map_filter,
                radius,
            } => self.start(&name, origin, map_filter, radius),
            RecordCommand::Stop => self.stop(),
            RecordCommand::Status => self.status(),
        }
    }

    fn start(&self, name: &str, origin: Option<&dyn Unit>, map_filter: u32, radius: f32) -> Vec<String> {
        if !self.controller.is_enabled() {
            return vec![
                "Event Recorder is disabled. Set enable = true in the recorder configuration."
                    .to_string(),
            ];
        }

        if self.controller.is_active() {
            return vec![
                "A recording session is already active. Stop it first with `record stop`.".to_string(),
            ];
        }

        match self.controller.start_session(name, origin, map_filter, radius) {
            Ok(_) => vec![
                format!("Recording started: '{}'", name),
                self.controller.session_info(),
            ],
            Err(e) => vec![format!("Failed to start recording session: {}", e)],
        }
    }

    fn stop(&self) -> Vec<String> {
        if !self.controller.is_active() {
            return vec!["No active recording session.".to_string()];
        }

        let info = self.controller.session_info();

        match self.controller.stop_session() {
            Ok(summary) => vec![
                "Recording stopped.".to_string(),
                info,
                format!("Saved {} events to {}", summary.events_captured, summary.path.display()),
            ],
            Err(e) => vec![format!("Failed to stop recording session: {}", e)],
        }
    }

    fn status(&self) -> Vec<String> {
        if !self.controller.is_enabled() {
            return vec!["Event Recorder is disabled.".to_string()];
        }

        vec![self.controller.session_info()]
    }
}

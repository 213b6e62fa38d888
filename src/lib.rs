// src/lib.rs
//! Encounter Recorder Library
//!
//! An opt-in, in-process recorder for combat telemetry inside a real-time
//! simulation host. Host worker threads report game events (combat, damage,
//! healing, auras, casts, deaths, evades) through a shared
//! [`SessionController`]; an operator starts and stops named sessions, and
//! each session writes a filtered, time-ordered JSON Lines file.
//!
//! # Architecture
//!
//! - **world**: read-only view of host units, spells and auras
//! - **recording**: session lifecycle, filtering, formatting, bounded writing
//! - **console**: operator `record start|stop|status` commands
//! - **observability**: tracing subscriber and metrics counters
//! - **utils**: configuration and error types

// Public module exports
pub mod console;
pub mod observability;
pub mod recording;
pub mod utils;
pub mod world;

// Re-export commonly used types
pub use recording::controller::{SessionController, SessionStatus};
pub use recording::session::SessionSummary;
pub use utils::config::RecorderConfig;
pub use utils::errors::{RecorderError, Result};
pub use world::{Aura, AuraApplication, SpellInfo, Unit, UnitKind, UnitSnapshot, WorldLocation};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}

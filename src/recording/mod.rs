// src/recording/mod.rs
//! Event recording
//!
//! - **Controller**: session lifecycle and the per-event-kind recording API
//! - **Session**: the open session's identity, filter, clock and writer
//! - **Filter**: map / instance / radius admission
//! - **Event**: entity descriptors and JSON Lines rendering
//! - **Writer**: capped, flushed, append-only session file
//!
//! # Data flow
//!
//! ```text
//! host hook → SessionController::record_*() ─ lock ─→ SessionFilter::admits()
//!                                                         ↓ (admitted)
//!                                              EventPayload (formatting)
//!                                                         ↓
//!                                              EventWriter::append()
//!                                                         ↓
//!                                       <output_dir>/<name>_<stamp>.jsonl
//! ```

pub mod controller;
pub mod event;
pub mod filter;
pub mod session;
pub mod writer;

// Re-export commonly used types
pub use controller::{SessionController, SessionStatus, NO_ACTIVE_SESSION};
pub use event::{EventPayload, RecordedLine, UnitDescriptor};
pub use filter::SessionFilter;
pub use session::SessionSummary;
pub use writer::{AppendOutcome, EventWriter, WriterStats};

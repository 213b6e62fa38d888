// src/utils/mod.rs
//! Shared utilities
//!
//! - **errors**: crate-wide error type and `Result` alias
//! - **config**: resolved recorder configuration snapshot and loading

pub mod config;
pub mod errors;

pub use config::RecorderConfig;
pub use errors::{RecorderError, Result};

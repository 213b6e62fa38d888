// src/main.rs
//! Encounter Recorder console
//!
//! Standalone operator console: loads the recorder configuration, reads
//! `record start|stop|status` commands from stdin and closes any open session
//! on EOF or Ctrl-C.
//!
//! Configuration file: first argument, else `EVENT_RECORDER_CONFIG`.
//! Log format: `EVENT_RECORDER_LOG_FORMAT=text|json`.

use anyhow::{Context, Result};
use encounter_recorder::console::Console;
use encounter_recorder::observability::{init_tracing, LogFormat};
use encounter_recorder::{RecorderConfig, SessionController};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let format = std::env::var("EVENT_RECORDER_LOG_FORMAT")
        .ok()
        .and_then(|value| LogFormat::parse(&value))
        .unwrap_or_default();
    init_tracing(format)?;

    info!("Starting Encounter Recorder console v{}", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("EVENT_RECORDER_CONFIG").ok())
        .map(PathBuf::from);

    let config = RecorderConfig::load(config_path.as_deref())
        .with_context(|| format!("Failed to load configuration from {:?}", config_path))?;
    info!("Configuration loaded: {:?}", config);

    let controller = SessionController::new(config);

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received shutdown signal, cleaning up...");
    };
    tokio::pin!(shutdown_signal);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = &mut shutdown_signal => break,
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read console input")? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                for reply in Console::new(&controller).execute(&line, None) {
                    println!("{}", reply);
                }
            }
        }
    }

    if controller.is_active() {
        match controller.stop_session() {
            Ok(summary) => info!(
                "Closed session '{}' on exit ({} events)",
                summary.name, summary.events_captured
            ),
            Err(e) => error!("Failed to close session on exit: {}", e),
        }
    }

    Ok(())
}

// src/recording/writer.rs
//! Bounded append-only JSON Lines writer
//!
//! Owns the output file of the active session. Data lines count against the
//! session cap; the `record_start`/`record_stop` bracket lines do not. Every
//! line is flushed as soon as it is written.

use crate::utils::errors::{RecorderError, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Result of appending a data line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// Line written and counted
    Written,

    /// Cap reached; line dropped
    Dropped,
}

/// Writer statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriterStats {
    /// Data lines written
    pub events_written: u32,

    /// Data lines dropped at the cap
    pub events_dropped: u64,

    /// Cap diagnostics emitted (0 or 1)
    pub cap_notices: u32,
}

/// Event writer for one session file
pub struct EventWriter {
    path: PathBuf,
    out: BufWriter<File>,
    max_events: u32,
    stats: WriterStats,
}

impl EventWriter {
    /// Create a new session file
    ///
    /// Fails with `AlreadyExists` (wrapped in [`RecorderError::OutputFile`])
    /// if the path is taken, so an earlier session is never overwritten.
    pub fn create<P: AsRef<Path>>(path: P, max_events: u32) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|source| RecorderError::OutputFile {
                path: path.clone(),
                source,
            })?;

        debug!("Opened session file {:?} (cap {} events)", path, max_events);

        let mut writer = Self {
            path,
            out: BufWriter::new(file),
            max_events,
            stats: WriterStats::default(),
        };

        // A zero cap is reached before the first event
        if max_events == 0 {
            writer.notice_cap();
        }

        Ok(writer)
    }

    /// Append a data line, honoring the cap
    pub fn append(&mut self, line: &str) -> Result<AppendOutcome> {
        if self.stats.events_written >= self.max_events {
            self.stats.events_dropped += 1;
            return Ok(AppendOutcome::Dropped);
        }

        self.write_line(line)?;
        self.stats.events_written += 1;

        if self.stats.events_written == self.max_events {
            self.notice_cap();
        }

        Ok(AppendOutcome::Written)
    }

    /// One-time diagnostic when the cap is first reached
    fn notice_cap(&mut self) {
        if self.stats.cap_notices > 0 {
            return;
        }

        warn!(
            "Max event limit ({}) reached for {:?}; further events are dropped",
            self.max_events, self.path
        );
        self.stats.cap_notices = 1;
    }

    /// Append a bracket line; never capped, never counted
    pub fn append_marker(&mut self, line: &str) -> Result<()> {
        self.write_line(line)
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        self.out.write_all(line.as_bytes())?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }

    /// Flush and sync, consuming the writer
    pub fn close(mut self) -> Result<WriterStats> {
        self.out.flush()?;
        self.out.get_ref().sync_all()?;
        debug!("Closed session file {:?}", self.path);
        Ok(self.stats)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn max_events(&self) -> u32 {
        self.max_events
    }

    pub fn events_written(&self) -> u32 {
        self.stats.events_written
    }

    pub fn stats(&self) -> &WriterStats {
        &self.stats
    }
}

/// True when `err` means the target file already exists
pub(crate) fn is_path_taken(err: &RecorderError) -> bool {
    matches!(err, RecorderError::OutputFile { source, .. } if source.kind() == ErrorKind::AlreadyExists)
}

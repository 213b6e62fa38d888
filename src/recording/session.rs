// src/recording/session.rs
//! The in-memory state of one open recording session

use crate::recording::event::{render_line, session_seconds, EventPayload};
use crate::recording::filter::SessionFilter;
use crate::recording::writer::{is_path_taken, AppendOutcome, EventWriter, WriterStats};
use crate::utils::errors::{RecorderError, Result};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::warn;

/// File name suffix attempts before giving up on a free path
const MAX_NAME_ATTEMPTS: u32 = 100;

/// Open session: identity, filter, start instant and writer
pub struct ActiveSession {
    name: String,
    filter: SessionFilter,
    started: Instant,
    writer: EventWriter,
}

impl ActiveSession {
    /// Create the session file and write the `record_start` line
    pub fn open(
        name: &str,
        output_dir: &Path,
        filter: SessionFilter,
        max_events: u32,
        now: DateTime<Local>,
    ) -> Result<Self> {
        let writer = create_session_file(output_dir, name, now, max_events)?;

        let mut session = Self {
            name: name.to_string(),
            filter,
            started: Instant::now(),
            writer,
        };

        let start = EventPayload::RecordStart {
            session: session.name.clone(),
            map: filter.map_filter,
            file: session.writer.path().display().to_string(),
        };
        let line = render_line(Duration::ZERO, &start)?;

        if let Err(e) = session.writer.append_marker(&line) {
            let path = session.writer.path().to_path_buf();
            drop(session);
            if let Err(cleanup) = std::fs::remove_file(&path) {
                warn!("Failed to remove partial session file {:?}: {}", path, cleanup);
            }
            return Err(e);
        }

        Ok(session)
    }

    /// Render and append a data event at the current session time
    pub fn write(&mut self, payload: &EventPayload) -> Result<AppendOutcome> {
        let line = render_line(self.elapsed(), payload)?;
        self.writer.append(&line)
    }

    /// Write `record_stop` and close the file
    pub fn close(mut self) -> Result<SessionSummary> {
        let elapsed = self.elapsed();
        let duration = session_seconds(elapsed);
        let events_captured = self.writer.events_written();

        let stop = EventPayload::RecordStop {
            session: self.name.clone(),
            duration,
            events_captured,
        };
        let line = render_line(elapsed, &stop)?;
        self.writer.append_marker(&line)?;

        let path = self.writer.path().to_path_buf();
        let stats = self.writer.close()?;

        Ok(SessionSummary {
            name: self.name,
            path,
            duration,
            events_captured,
            stats,
        })
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn filter(&self) -> &SessionFilter {
        &self.filter
    }

    pub fn path(&self) -> &Path {
        self.writer.path()
    }

    pub fn events_written(&self) -> u32 {
        self.writer.events_written()
    }

    pub fn max_events(&self) -> u32 {
        self.writer.max_events()
    }

    pub fn stats(&self) -> &WriterStats {
        self.writer.stats()
    }
}

/// What a stopped session produced
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub name: String,
    pub path: PathBuf,

    /// Seconds between start and stop, millisecond resolution
    pub duration: f64,

    pub events_captured: u32,
    pub stats: WriterStats,
}

/// `<dir>/<name>_<YYYYmmdd_HHMMSS>.jsonl`, with `_<n>` appended on collision
pub fn session_file_name(name: &str, now: DateTime<Local>, attempt: u32) -> String {
    let stamp = now.format("%Y%m%d_%H%M%S");
    if attempt == 0 {
        format!("{}_{}.jsonl", name, stamp)
    } else {
        format!("{}_{}_{}.jsonl", name, stamp, attempt)
    }
}

fn create_session_file(
    output_dir: &Path,
    name: &str,
    now: DateTime<Local>,
    max_events: u32,
) -> Result<EventWriter> {
    let mut last_err = None;

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let path = output_dir.join(session_file_name(name, now, attempt));
        match EventWriter::create(&path, max_events) {
            Ok(writer) => return Ok(writer),
            Err(e) if is_path_taken(&e) => last_err = Some(e),
            Err(e) => return Err(e),
        }
    }

    Err(last_err.unwrap_or_else(|| RecorderError::OutputFile {
        path: output_dir.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::AlreadyExists, "no free file name"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::event::RecordedLine;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 21, 5, 7).unwrap()
    }

    #[test]
    fn test_file_name() {
        assert_eq!(session_file_name("boss1", fixed_now(), 0), "boss1_20240309_210507.jsonl");
        assert_eq!(session_file_name("boss1", fixed_now(), 2), "boss1_20240309_210507_2.jsonl");
    }

    #[test]
    fn test_open_writes_start_line() {
        let dir = tempdir().unwrap();
        let filter = SessionFilter {
            map_filter: 409,
            ..Default::default()
        };
        let session = ActiveSession::open("molten", dir.path(), filter, 10, fixed_now()).unwrap();

        let content = std::fs::read_to_string(session.path()).unwrap();
        let first = content.lines().next().unwrap();
        assert!(first.starts_with(r#"{"t":0.000,"event":"record_start","session":"molten","map":409,"file":"#));
        assert_eq!(session.events_written(), 0);
    }

    #[test]
    fn test_same_second_sessions_do_not_collide() {
        let dir = tempdir().unwrap();
        let first = ActiveSession::open("wipe", dir.path(), SessionFilter::neutral(), 10, fixed_now()).unwrap();
        let second = ActiveSession::open("wipe", dir.path(), SessionFilter::neutral(), 10, fixed_now()).unwrap();

        assert_ne!(first.path(), second.path());
        assert!(second.path().to_string_lossy().ends_with("wipe_20240309_210507_1.jsonl"));
    }

    #[test]
    fn test_close_writes_stop_line() {
        let dir = tempdir().unwrap();
        let mut session =
            ActiveSession::open("trash", dir.path(), SessionFilter::neutral(), 10, fixed_now()).unwrap();

        session.write(&EventPayload::leave_combat(None)).unwrap();
        session.write(&EventPayload::evade(None, 1)).unwrap();

        let summary = session.close().unwrap();
        assert_eq!(summary.name, "trash");
        assert_eq!(summary.events_captured, 2);

        let content = std::fs::read_to_string(&summary.path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 4);

        let last = RecordedLine::parse(lines[3]).unwrap();
        match last.payload {
            EventPayload::RecordStop { session, events_captured, .. } => {
                assert_eq!(session, "trash");
                assert_eq!(events_captured, 2);
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }
}

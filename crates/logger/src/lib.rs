//! Logging for the statement workspace.
//!
//! Two outputs: human-oriented `tracing` output on stderr, filtered through
//! `RUST_LOG`, and a machine-readable JSON-lines event log that records the
//! outcome of every file in a batch run.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Installs the global fmt subscriber.
///
/// `default_directives` applies when `RUST_LOG` is unset or invalid, e.g.
/// `"info,general_parser=debug"`. Calling this twice is harmless; the first
/// subscriber stays installed.
pub fn init_tracing(default_directives: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directives.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: String,
    pub level: EventLevel,
    pub file: String,
    pub event: String,
    pub detail: String,
}

/// Append-only JSON-lines log of batch outcomes.
pub struct EventLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl EventLog {
    /// Opens (and creates the parent directory of) the log at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&self, level: EventLevel, file: &str, event: &str, detail: &str) -> io::Result<()> {
        let entry = Event {
            timestamp: Utc::now().to_rfc3339(),
            level,
            file: file.to_string(),
            event: event.to_string(),
            detail: detail.to_string(),
        };
        let line = serde_json::to_string(&entry).map_err(io::Error::other)?;

        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut out = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(out, "{}", line)
    }

    pub fn info(&self, file: &str, event: &str, detail: &str) -> io::Result<()> {
        self.record(EventLevel::Info, file, event, detail)
    }

    pub fn warn(&self, file: &str, event: &str, detail: &str) -> io::Result<()> {
        self.record(EventLevel::Warn, file, event, detail)
    }

    pub fn error(&self, file: &str, event: &str, detail: &str) -> io::Result<()> {
        self.record(EventLevel::Error, file, event, detail)
    }

    /// Reads every entry back, skipping malformed lines.
    pub fn read_all(&self) -> io::Result<Vec<Event>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        Ok(raw
            .lines()
            .filter_map(|l| serde_json::from_str::<Event>(l).ok())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_log_appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = EventLog::open(dir.path().join("logs/events.jsonl")).unwrap();

        log.info("a.xlsx", "parsed", "12 holdings").unwrap();
        log.error("b.xlsx", "header_not_found", "no header row").unwrap();

        let events = log.read_all().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].level, EventLevel::Info);
        assert_eq!(events[1].file, "b.xlsx");
        assert_eq!(events[1].event, "header_not_found");

        let raw = fs::read_to_string(log.path()).unwrap();
        assert!(raw.contains("\"level\":\"error\""));
    }

    #[test]
    fn test_read_all_on_missing_log_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = EventLog::open(dir.path().join("events.jsonl")).unwrap();
        assert!(log.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_init_tracing_twice_does_not_panic() {
        init_tracing("warn");
        init_tracing("debug");
    }
}

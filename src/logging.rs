//! Logging backend: a bounded buffer of recent records, shared with the TUI.
//!
//! `CueLogger` implements [`log::Log`]. In the TUI it writes into a
//! [`SharedLog`] that the log overlay renders; headless it writes to stderr.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

use log::{Level, LevelFilter, Log, Metadata, Record};

/// A timestamped log record.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: SystemTime,
    pub level: Level,
    pub message: String,
}

/// Circular buffer of recent log records.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a record, evicting the oldest if at capacity.
    pub fn push(&mut self, level: Level, message: String) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            timestamp: SystemTime::now(),
            level,
            message,
        });
    }

    /// Get the N most recent entries (newest last).
    pub fn recent(&self, n: usize) -> Vec<&LogEntry> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// The newest entry at `Warn` or worse, for the status bar.
    pub fn last_problem(&self) -> Option<&LogEntry> {
        self.entries.iter().rev().find(|e| e.level <= Level::Warn)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(200)
    }
}

/// Log buffer handle shared between the logger and the UI.
#[derive(Debug, Clone, Default)]
pub struct SharedLog(Arc<Mutex<LogBuffer>>);

impl SharedLog {
    pub fn new(capacity: usize) -> Self {
        Self(Arc::new(Mutex::new(LogBuffer::new(capacity))))
    }

    pub fn push(&self, level: Level, message: String) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(level, message);
    }

    /// Run `f` against the buffer. A poisoned lock still yields the data.
    pub fn with<R>(&self, f: impl FnOnce(&LogBuffer) -> R) -> R {
        let guard = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }
}

/// Where log records end up.
#[derive(Debug, Clone)]
pub enum LogTarget {
    Buffer(SharedLog),
    Stderr,
}

/// The crate's `log` backend.
#[derive(Debug)]
pub struct CueLogger {
    target: LogTarget,
    level: LevelFilter,
}

impl CueLogger {
    pub fn new(target: LogTarget, level: LevelFilter) -> Self {
        Self { target, level }
    }

    /// Install as the global logger. Fails if a logger is already set.
    pub fn install(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for CueLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.target().starts_with("cuelab")
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        match &self.target {
            LogTarget::Buffer(shared) => shared.push(record.level(), record.args().to_string()),
            LogTarget::Stderr => eprintln!("[{:<5}] {}", record.level(), record.args()),
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_empty() {
        let log = LogBuffer::new(10);
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
    }

    #[test]
    fn capacity_overflow_evicts_oldest() {
        let mut log = LogBuffer::new(3);
        for m in ["a", "b", "c", "d"] {
            log.push(Level::Info, m.to_string());
        }
        assert_eq!(log.len(), 3);
        let messages: Vec<&str> = log.entries().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["b", "c", "d"]);
    }

    #[test]
    fn recent_returns_newest() {
        let mut log = LogBuffer::new(10);
        for m in ["a", "b", "c"] {
            log.push(Level::Info, m.to_string());
        }
        let recent = log.recent(2);
        assert_eq!(recent[0].message, "b");
        assert_eq!(recent[1].message, "c");
        assert_eq!(log.recent(5).len(), 3);
    }

    #[test]
    fn last_problem_skips_info() {
        let mut log = LogBuffer::new(10);
        log.push(Level::Warn, "bad group".to_string());
        log.push(Level::Info, "saved".to_string());
        assert_eq!(log.last_problem().unwrap().message, "bad group");
    }

    #[test]
    fn shared_log_clones_see_same_buffer() {
        let shared = SharedLog::new(5);
        let other = shared.clone();
        other.push(Level::Error, "port gone".to_string());
        assert_eq!(shared.with(|b| b.len()), 1);
    }

    #[test]
    fn logger_filters_level_and_target() {
        let shared = SharedLog::new(5);
        let logger = CueLogger::new(LogTarget::Buffer(shared.clone()), LevelFilter::Warn);

        for (level, target) in [
            (Level::Warn, "cuelab::cue::parser"),
            (Level::Debug, "cuelab::sequencer"),
            (Level::Error, "midir"),
        ] {
            logger.log(
                &Record::builder()
                    .level(level)
                    .target(target)
                    .args(format_args!("{target}"))
                    .build(),
            );
        }

        let messages: Vec<String> =
            shared.with(|b| b.entries().map(|e| e.message.clone()).collect());
        assert_eq!(messages, vec!["cuelab::cue::parser".to_string()]);
    }
}

//! Progress events for loader runs.
//!
//! A run reports one `Discover` event, one `File` event per input file and
//! one `Unit` event per page or list entry, each with a known total. The
//! reporter stamps the elapsed time and forwards to an optional callback.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Stage of a loader run an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Input files were listed
    Discover,
    /// An input file is about to be read
    File,
    /// A page or list entry was extracted and offered to the chunker
    Unit,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discover => "discover",
            Self::File => "file",
            Self::Unit => "unit",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to one page or list entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitOutcome {
    /// Text was new and produced this many chunks
    Chunked(usize),
    /// No text was extracted
    Empty,
    /// The same text was already seen in this run
    Duplicate,
    /// The page could not be read
    Unreadable,
}

impl fmt::Display for UnitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chunked(1) => f.write_str("1 chunk"),
            Self::Chunked(n) => write!(f, "{} chunks", n),
            Self::Empty => f.write_str("no text"),
            Self::Duplicate => f.write_str("duplicate"),
            Self::Unreadable => f.write_str("unreadable"),
        }
    }
}

/// One progress event.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    pub phase: Phase,

    /// 1-based position within `total` (equal to `total` for `Discover`)
    pub current: u64,

    pub total: u64,

    /// File name, or the unit description and its outcome
    pub message: String,

    /// Seconds since the reporter was created
    pub elapsed_secs: f64,
}

impl ProgressEvent {
    /// Format as a single user-facing line, e.g. `[unit 2/5] page 1 of a.pdf: 3 chunks`.
    pub fn format_simple(&self) -> String {
        format!(
            "[{} {}/{}] {}",
            self.phase, self.current, self.total, self.message
        )
    }
}

/// Callback for progress events.
pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Forwards loader progress to an optional callback.
#[derive(Clone)]
pub struct ProgressReporter {
    callback: Option<ProgressCallback>,
    start_time: Instant,
}

impl ProgressReporter {
    pub fn new(callback: ProgressCallback) -> Self {
        Self {
            callback: Some(callback),
            start_time: Instant::now(),
        }
    }

    /// Reporter that drops every event.
    pub fn noop() -> Self {
        Self {
            callback: None,
            start_time: Instant::now(),
        }
    }

    fn emit(&self, phase: Phase, current: u64, total: u64, message: String) {
        let Some(callback) = &self.callback else {
            return;
        };

        let event = ProgressEvent {
            phase,
            current,
            total,
            message,
            elapsed_secs: self.start_time.elapsed().as_secs_f64(),
        };
        tracing::debug!(
            phase = %event.phase,
            current = event.current,
            total = event.total,
            "{}",
            event.message
        );
        callback(event);
    }

    /// `files` inputs were found under `location`.
    pub fn discover(&self, files: usize, location: &str) {
        self.emit(
            Phase::Discover,
            files as u64,
            files as u64,
            format!("{} input files in {}", files, location),
        );
    }

    /// Reading file `index` (0-based) of `total`.
    pub fn file(&self, index: usize, total: usize, name: &str) {
        self.emit(Phase::File, index as u64 + 1, total as u64, name.to_string());
    }

    /// Unit `index` (0-based) of the `total` in the current file is done.
    pub fn unit(&self, index: usize, total: usize, label: &str, outcome: UnitOutcome) {
        self.emit(
            Phase::Unit,
            index as u64 + 1,
            total as u64,
            format!("{}: {}", label, outcome),
        );
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::noop()
    }
}

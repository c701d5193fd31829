use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;
use std::panic::Location;
use std::sync::RwLock;

use crate::errors::EmitError;
use crate::formatters::Formatter;
use crate::record::Record;
use crate::severity::Severity;
use crate::sinks::Sink;

// Separator between the caller's message and the appended failure details in
// error_with output. Fixed so downstream grep patterns can rely on it.
const FAILURE_DELIMITER: &str = " || ";

struct Destination {
    formatter: Formatter,
    sink: Box<dyn Sink>,
}

/// A named logger: a severity threshold plus an ordered list of
/// formatter/sink destinations. Shared out of the registry as `Arc<Logger>`;
/// configuration goes through `set_threshold` and `add_destination`, emits
/// only read.
pub struct Logger {
    name: String,
    threshold: RwLock<Severity>,
    destinations: RwLock<Vec<Destination>>,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}

impl Logger {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            threshold: RwLock::new(Severity::Debug),
            destinations: RwLock::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn threshold(&self) -> Severity {
        *self.threshold.read().unwrap()
    }

    /// Takes effect for subsequent emits; an emit already past its threshold
    /// check is not recalled.
    pub fn set_threshold(&self, threshold: Severity) {
        *self.threshold.write().unwrap() = threshold;
    }

    /// Appends a destination. The formatter's template was already validated
    /// when the `Formatter` was constructed, so misconfiguration has
    /// surfaced before this point.
    pub fn add_destination(&self, formatter: Formatter, sink: Box<dyn Sink>) {
        self.destinations
            .write()
            .unwrap()
            .push(Destination { formatter, sink });
    }

    /// Filters by threshold, then renders and writes the record to each
    /// destination in registration order. A failing destination never stops
    /// the remaining ones; failures come back aggregated.
    #[track_caller]
    pub fn try_emit(&self, severity: Severity, message: &str) -> Result<(), EmitError> {
        let line = Location::caller().line();
        self.dispatch(severity, line, message)
    }

    /// Like `try_emit`, but failures go to the fallback notice channel
    /// instead of the caller. Logging must never knock the caller's own
    /// control flow off course.
    #[track_caller]
    pub fn emit(&self, severity: Severity, message: &str) {
        let line = Location::caller().line();
        if let Err(err) = self.dispatch(severity, line, message) {
            eprintln!("scribe: logger {:?} failed to log: {err}", self.name);
        }
    }

    fn dispatch(&self, severity: Severity, line: u32, message: &str) -> Result<(), EmitError> {
        if !severity.meets(self.threshold()) {
            // No Record is constructed for filtered-out emits.
            return Ok(());
        }

        let record = Record::capture(severity, line, message.to_string());
        let destinations = self.destinations.read().unwrap();

        let mut failures = Vec::new();
        for (index, destination) in destinations.iter().enumerate() {
            let rendered = destination.formatter.render(&record);
            if let Err(err) = destination.sink.write(&rendered) {
                failures.push((index, err));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(EmitError {
                attempted: destinations.len(),
                failures,
            })
        }
    }

    #[track_caller]
    pub fn trace(&self, message: &str) {
        self.emit(Severity::Trace, message);
    }

    #[track_caller]
    pub fn debug(&self, message: &str) {
        self.emit(Severity::Debug, message);
    }

    #[track_caller]
    pub fn info(&self, message: &str) {
        self.emit(Severity::Info, message);
    }

    #[track_caller]
    pub fn warn(&self, message: &str) {
        self.emit(Severity::Warn, message);
    }

    #[track_caller]
    pub fn error(&self, message: &str) {
        self.emit(Severity::Error, message);
    }

    #[track_caller]
    pub fn critical(&self, message: &str) {
        self.emit(Severity::Critical, message);
    }

    /// Emits at ERROR with the propagating failure's description, its source
    /// chain and, when one was actually captured, a backtrace, appended to
    /// the message behind a fixed delimiter. The original error is borrowed,
    /// never consumed or suppressed.
    #[track_caller]
    pub fn error_with(&self, message: &str, error: &(dyn Error + 'static)) {
        self.emit(Severity::Error, &render_failure(message, error));
    }

    pub fn flush(&self) {
        let destinations = self.destinations.read().unwrap();
        for (index, destination) in destinations.iter().enumerate() {
            if let Err(err) = destination.sink.flush() {
                eprintln!(
                    "scribe: logger {:?} failed to flush destination {index}: {err}",
                    self.name
                );
            }
        }
    }
}

fn render_failure(message: &str, error: &(dyn Error + 'static)) -> String {
    let mut text = format!("{message}{FAILURE_DELIMITER}{error}");

    let mut cause = error.source();
    while let Some(err) = cause {
        text.push_str(FAILURE_DELIMITER);
        text.push_str("caused by: ");
        text.push_str(&err.to_string());
        cause = err.source();
    }

    let backtrace = Backtrace::capture();
    if backtrace.status() == BacktraceStatus::Captured {
        text.push_str(FAILURE_DELIMITER);
        text.push_str("backtrace: ");
        // Collapsed to one line so multi-line traces cannot tear a record
        // across concurrent writers.
        let trace = backtrace.to_string();
        let mut frames = trace.split_whitespace();
        if let Some(first) = frames.next() {
            text.push_str(first);
            for word in frames {
                text.push(' ');
                text.push_str(word);
            }
        }
    }

    text
}

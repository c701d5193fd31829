use std::fs::File;
use std::io::{self, LineWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::SinkError;

/// A log destination. Implementations serialize their own writes so two
/// concurrent emits never interleave bytes mid-line.
pub trait Sink: Send + Sync {
    fn write(&self, line: &str) -> Result<(), SinkError>;
    fn flush(&self) -> Result<(), SinkError>;
}

/// Writes to standard error and flushes per line, so records are visible
/// before a crash.
pub struct StderrSink {
    handle: io::Stderr,
}

impl StderrSink {
    pub fn new() -> Self {
        Self {
            handle: io::stderr(),
        }
    }
}

impl Default for StderrSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for StderrSink {
    fn write(&self, line: &str) -> Result<(), SinkError> {
        let mut writer = self.handle.lock();

        writeln!(writer, "{line}")?;
        writer.flush()?;
        Ok(())
    }

    fn flush(&self) -> Result<(), SinkError> {
        self.handle.lock().flush()?;
        Ok(())
    }
}

/// Appends to a log file, one line per record, flushed per write. `close`
/// drops the writer; later writes report `SinkError::Closed`.
pub struct FileSink {
    file: Mutex<Option<LineWriter<File>>>,
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;

        Ok(Self {
            file: Mutex::new(Some(LineWriter::new(file))),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn close(&self) {
        if let Ok(mut slot) = self.file.lock() {
            if let Some(mut writer) = slot.take() {
                let _ = writer.flush();
            }
        }
    }
}

impl Sink for FileSink {
    fn write(&self, line: &str) -> Result<(), SinkError> {
        let mut slot = self.file.lock().map_err(|_| SinkError::Closed)?;
        let writer = slot.as_mut().ok_or(SinkError::Closed)?;

        writeln!(writer, "{line}")?;
        writer.flush()?;
        Ok(())
    }

    fn flush(&self) -> Result<(), SinkError> {
        let mut slot = self.file.lock().map_err(|_| SinkError::Closed)?;
        if let Some(writer) = slot.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }
}

/// Collects rendered lines in memory. Clones share the same buffer, so a
/// test can hand one handle to a logger and read back through another.
#[derive(Clone, Default)]
pub struct MemorySink {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    lines: Mutex<Vec<String>>,
    closed: AtomicBool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.inner.lines.lock().map(|lines| lines.clone()).unwrap_or_default()
    }

    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
    }
}

impl Sink for MemorySink {
    fn write(&self, line: &str) -> Result<(), SinkError> {
        if self.inner.closed.load(Ordering::SeqCst) {
            return Err(SinkError::Closed);
        }

        let mut lines = self.inner.lines.lock().map_err(|_| SinkError::Closed)?;
        lines.push(line.to_string());
        Ok(())
    }

    fn flush(&self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Accepts and discards everything. Stands in for a disabled destination.
pub struct NullSink;

impl Sink for NullSink {
    fn write(&self, _line: &str) -> Result<(), SinkError> {
        Ok(())
    }

    fn flush(&self) -> Result<(), SinkError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_preserves_write_order_across_clones() {
        let sink = MemorySink::new();
        let handle = sink.clone();

        sink.write("first").unwrap();
        handle.write("second").unwrap();

        assert_eq!(sink.lines(), vec!["first", "second"]);
    }

    #[test]
    fn closed_memory_sink_reports_instead_of_dropping() {
        let sink = MemorySink::new();
        sink.write("kept").unwrap();
        sink.close();

        assert!(matches!(sink.write("lost"), Err(SinkError::Closed)));
        assert_eq!(sink.lines(), vec!["kept"]);
    }

    #[test]
    fn file_sink_appends_one_line_per_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scribe.log");

        let sink = FileSink::new(&path).unwrap();
        assert_eq!(sink.path(), path);

        sink.write("first").unwrap();
        sink.write("second").unwrap();
        sink.flush().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[test]
    fn closed_file_sink_reports_closed() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("scribe.log")).unwrap();

        sink.write("before close").unwrap();
        sink.close();

        assert!(matches!(sink.write("after close"), Err(SinkError::Closed)));
        assert!(sink.flush().is_ok());
    }

    #[test]
    fn null_sink_never_fails() {
        let sink = NullSink;

        assert!(sink.write("anything").is_ok());
        assert!(sink.flush().is_ok());
    }
}

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

use crate::severity::Severity;

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_ID: u64 = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
}

/// Integer id for the calling thread. `std::thread::ThreadId` has no stable
/// integer form, so ids are handed out from a process-wide counter on the
/// first use per thread.
pub fn current_thread_id() -> u64 {
    THREAD_ID.with(|id| *id)
}

/// One emitted log event. Constructed exactly once per passing emit and
/// dropped after every destination has processed it.
#[derive(Debug, Clone)]
pub struct Record {
    pub timestamp: DateTime<Utc>,
    pub pid: u32,
    pub tid: u64,
    pub severity: Severity,
    pub line: u32,
    pub message: String,
}

impl Record {
    pub fn capture(severity: Severity, line: u32, message: String) -> Self {
        Self {
            timestamp: Utc::now(),
            pid: std::process::id(),
            tid: current_thread_id(),
            severity,
            line,
            message,
        }
    }
}

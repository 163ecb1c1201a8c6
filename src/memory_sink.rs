use parking_lot::Mutex;
use std::sync::Arc;

use crate::config::LoggerConfig;
use crate::record::LogRecord;
use crate::severity::Severity;
use crate::sink::{Sink, SinkError};

/// Snapshot of a record as seen by a [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRecord {
    pub severity: Severity,
    pub caller: String,
    pub text: String,
}

/// A sink that keeps every record it receives in memory.
///
/// Useful for tests that assert on what reached the sinks, and for
/// measuring the dispatch overhead without any I/O. Clones share storage.
#[derive(Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<CapturedRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<CapturedRecord> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Sink for MemorySink {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn write(&mut self, record: &LogRecord, _config: &LoggerConfig) -> Result<(), SinkError> {
        self.records.lock().push(CapturedRecord {
            severity: record.severity,
            caller: record.caller.clone(),
            text: record.text().to_string(),
        });
        Ok(())
    }
}

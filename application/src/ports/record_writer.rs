//! Port for persisting capture records.
//!
//! Defines the [`RecordWriter`] trait that turns one [`CaptureRecord`] into
//! one durable artifact (e.g. a JSON file).
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port persists the full
//! snapshot or interaction in a machine-readable, replayable form.

use capture_domain::{CaptureError, CaptureRecord};
use std::path::PathBuf;
use std::sync::Mutex;

/// Port for writing capture records.
///
/// Implementations must be safe under concurrent calls and must never
/// overwrite an existing artifact. Failures are returned, never panicked;
/// the recorders downgrade them to warnings.
pub trait RecordWriter: Send + Sync {
    /// Persist a record, returning where it landed.
    fn write(&self, record: &CaptureRecord) -> Result<PathBuf, CaptureError>;
}

/// In-memory writer for tests and hosts that consume records directly.
///
/// Returns a pseudo path of the form `memory/{stem}.json`.
#[derive(Default)]
pub struct InMemoryRecordWriter {
    records: Mutex<Vec<CaptureRecord>>,
}

impl InMemoryRecordWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies of everything written so far, in write order.
    pub fn records(&self) -> Vec<CaptureRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordWriter for InMemoryRecordWriter {
    fn write(&self, record: &CaptureRecord) -> Result<PathBuf, CaptureError> {
        let path = PathBuf::from("memory").join(format!("{}.json", record.file_stem()));
        let mut records = match self.records.lock() {
            Ok(records) => records,
            Err(poisoned) => poisoned.into_inner(),
        };
        records.push(record.clone());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capture_domain::{MessageSnapshotRecord, MessageView};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_in_memory_writer_keeps_order() {
        let writer = InMemoryRecordWriter::new();
        assert!(writer.is_empty());

        let ts = Utc.with_ymd_and_hms(2025, 2, 3, 4, 5, 6).unwrap();
        let first = MessageSnapshotRecord::capture(ts, "a", vec![MessageView::user("1")]);
        let second = MessageSnapshotRecord::capture(ts, "b", Vec::new());

        let path = writer.write(&first.clone().into()).unwrap();
        writer.write(&second.clone().into()).unwrap();

        assert_eq!(
            path,
            PathBuf::from("memory/real_messages_20250203_040506_000.json")
        );
        assert_eq!(
            writer.records(),
            vec![CaptureRecord::from(first), CaptureRecord::from(second)]
        );
    }
}

//! Wiring for hosts: both recorders sharing one JSON file writer.

use crate::logging::JsonFileRecordWriter;
use capture_application::{
    CaptureConfig, Clock, InteractionRecorder, MessageSnapshotRecorder, RecordWriter,
};
use std::sync::Arc;

/// The two capture points of a host, backed by the same writer.
pub struct CaptureRecorders {
    pub snapshots: MessageSnapshotRecorder,
    pub interactions: InteractionRecorder,
}

impl CaptureRecorders {
    /// Write records as JSON files under `config.log_dir`.
    pub fn from_config(config: &CaptureConfig) -> Self {
        Self::with_writer(Arc::new(JsonFileRecordWriter::new(&config.log_dir)), config)
    }

    pub fn with_writer(writer: Arc<dyn RecordWriter>, config: &CaptureConfig) -> Self {
        Self {
            snapshots: MessageSnapshotRecorder::new(writer.clone(), config),
            interactions: InteractionRecorder::new(writer, config),
        }
    }

    pub fn with_clock(self, clock: Arc<dyn Clock>) -> Self {
        Self {
            snapshots: self.snapshots.with_clock(clock.clone()),
            interactions: self.interactions.with_clock(clock),
        }
    }
}

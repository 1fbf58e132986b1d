//! Message snapshot use case.
//!
//! Called by the host's memory component once per message-array build.
//! Copies the array, derives role statistics and per-message debug info,
//! and hands one `real_messages` record to the [`RecordWriter`].

use super::outcome::{CaptureOutcome, guarded};
use crate::config::CaptureConfig;
use crate::ports::clock::{Clock, SystemClock};
use crate::ports::record_writer::RecordWriter;
use capture_domain::{CaptureRecord, MessageSnapshotRecord, MessageView};
use chrono::SubsecRound;
use std::sync::Arc;

pub struct MessageSnapshotRecorder {
    writer: Arc<dyn RecordWriter>,
    clock: Arc<dyn Clock>,
    enabled: bool,
    max_content_chars: usize,
}

impl MessageSnapshotRecorder {
    pub fn new(writer: Arc<dyn RecordWriter>, config: &CaptureConfig) -> Self {
        Self {
            writer,
            clock: Arc::new(SystemClock),
            enabled: config.enabled,
            max_content_chars: config.max_content_chars,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Capture one message array under a free-form session label.
    ///
    /// Exactly one write is attempted per call. Safe on an empty array.
    pub fn record_snapshot(&self, messages: &[MessageView], session: &str) -> CaptureOutcome {
        if !self.enabled {
            return CaptureOutcome::Disabled;
        }

        guarded("record_snapshot", || {
            let timestamp = self.clock.now().trunc_subsecs(3);
            let views = messages
                .iter()
                .map(|m| m.clone().with_debug_info().bounded(self.max_content_chars))
                .collect();

            let record = MessageSnapshotRecord::capture(timestamp, session, views);
            record.validate()?;
            self.writer.write(&CaptureRecord::Snapshot(record))
        })
    }
}

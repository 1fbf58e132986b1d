//! Sum type handed to the log writer.

use super::interaction::InteractionRecord;
use super::kind::RecordKind;
use super::snapshot::MessageSnapshotRecord;
use crate::core::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A fully populated record, ready to be persisted exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CaptureRecord {
    Snapshot(MessageSnapshotRecord),
    Interaction(InteractionRecord),
}

impl CaptureRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            CaptureRecord::Snapshot(_) => RecordKind::RealMessages,
            CaptureRecord::Interaction(_) => RecordKind::LlmInteraction,
        }
    }

    /// Instant the record's file name is derived from.
    ///
    /// Interactions are named after their request instant.
    pub fn captured_at(&self) -> DateTime<Utc> {
        match self {
            CaptureRecord::Snapshot(r) => r.timestamp,
            CaptureRecord::Interaction(r) => r.request_timestamp,
        }
    }

    pub fn file_stem(&self) -> String {
        self.kind().file_stem(&self.captured_at())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            CaptureRecord::Snapshot(r) => r.validate(),
            CaptureRecord::Interaction(r) => r.validate(),
        }
    }
}

impl From<MessageSnapshotRecord> for CaptureRecord {
    fn from(record: MessageSnapshotRecord) -> Self {
        CaptureRecord::Snapshot(record)
    }
}

impl From<InteractionRecord> for CaptureRecord {
    fn from(record: InteractionRecord) -> Self {
        CaptureRecord::Interaction(record)
    }
}

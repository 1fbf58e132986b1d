//! Application layer for llm-capture
//!
//! This crate contains the recorders, the ports they write through, and the
//! capture configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{CaptureConfig, DEFAULT_MAX_CONTENT_CHARS, default_log_dir};
pub use ports::{
    clock::{Clock, SystemClock},
    record_writer::{InMemoryRecordWriter, RecordWriter},
};
pub use use_cases::outcome::CaptureOutcome;
pub use use_cases::record_interaction::{InteractionHandle, InteractionRecorder};
pub use use_cases::record_snapshot::MessageSnapshotRecorder;

//! Domain error types
//!
//! Three failure families exist inside the capture subsystem:
//!
//! - [`ValidationError`]: a record was assembled with inconsistent fields
//! - [`ProtocolError`]: the two-phase interaction protocol was misused
//! - [`CaptureError::Io`]: persisting a record failed
//!
//! [`CaptureError`] is the umbrella type returned through the recorder
//! boundary, where every variant is downgraded to a warning.

use crate::message::entities::Role;
use crate::record::kind::RecordKind;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// A record whose fields contradict each other.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error(
        "message counts disagree: total_messages={total}, role_sequence={sequence}, messages={messages}"
    )]
    LengthMismatch {
        total: usize,
        sequence: usize,
        messages: usize,
    },

    #[error("role_sequence[{index}] is {sequence} but the message role is {message}")]
    RoleOrderMismatch {
        index: usize,
        sequence: Role,
        message: Role,
    },

    #[error("role_distribution {found:?} is not derivable from role_sequence {expected:?}")]
    RoleDistributionMismatch {
        expected: BTreeMap<Role, usize>,
        found: BTreeMap<Role, usize>,
    },

    #[error("response timestamp {response} precedes request timestamp {request}")]
    ResponseBeforeRequest {
        request: DateTime<Utc>,
        response: DateTime<Utc>,
    },

    #[error("latency_seconds={recorded} does not match the timestamp difference {expected}")]
    LatencyMismatch { recorded: f64, expected: f64 },

    #[error("token usage total {total} != prompt {prompt} + completion {completion}")]
    TokenUsageMismatch {
        prompt: u64,
        completion: u64,
        total: u64,
    },
}

/// Misuse of the begin/complete interaction protocol.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("interaction handle {0} is unknown or was already completed")]
    UnknownHandle(String),

    #[error("interaction handle {handle} was issued by recorder {issuer}, not recorder {recorder}")]
    ForeignHandle {
        handle: String,
        issuer: u64,
        recorder: u64,
    },

    #[error("interaction {handle} completed at {completed} before it began at {began}")]
    CompletedBeforeBegin {
        handle: String,
        began: DateTime<Utc>,
        completed: DateTime<Utc>,
    },
}

/// Any failure raised while capturing a record.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Invalid record: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize {kind} record: {source}")]
    Serialize {
        kind: RecordKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Capture panicked during {0}")]
    Panicked(&'static str),
}

impl CaptureError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CaptureError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, CaptureError::Validation(_))
    }

    pub fn is_io(&self) -> bool {
        matches!(self, CaptureError::Io { .. })
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self, CaptureError::Protocol(_))
    }
}

//! Domain layer for llm-capture
//!
//! This crate contains the record model, message views and response
//! extraction. It has no dependencies on infrastructure concerns and
//! performs no I/O.
//!
//! # Core Concepts
//!
//! ## Snapshot
//!
//! A copy of the chat-completion message array taken at the moment the
//! host's memory component builds it, enriched with role statistics.
//!
//! ## Interaction
//!
//! One request/response exchange with a model backend: request messages and
//! options, timing, response text, tool calls and token usage.

pub mod core;
pub mod message;
pub mod record;
pub mod response;

// Re-export commonly used types
pub use core::{
    error::{CaptureError, ProtocolError, ValidationError},
    string::{TRUNCATION_MARKER, Truncation, bound_text},
};
pub use message::{
    entities::{ContentPart, ImageUrl, MessageContent, Role},
    tool_call::{ToolArguments, ToolCall},
    view::{MessageDebugInfo, MessageView},
};
pub use record::{
    SCHEMA_VERSION,
    capture::CaptureRecord,
    interaction::{CallFailure, InteractionRecord, InteractionRequest, TokenUsage, latency_between},
    kind::RecordKind,
    snapshot::MessageSnapshotRecord,
};
pub use response::extract::ResponseView;

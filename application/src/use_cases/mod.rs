//! Use cases
//!
//! Capture operations the host calls at its two instrumentation points:
//! after building a message array, and around each model call.

pub mod outcome;
pub mod record_interaction;
pub mod record_snapshot;

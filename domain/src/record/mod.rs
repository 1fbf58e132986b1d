//! Record model: self-describing, immutable capture records.
//!
//! - [`snapshot::MessageSnapshotRecord`]: a message array at build time
//! - [`interaction::InteractionRecord`]: one model call, request and response
//! - [`capture::CaptureRecord`]: either of the above, as handed to a writer
//! - [`kind::RecordKind`]: kind tag and file stem
//!
//! Records are pure data: constructing them performs no I/O.

pub mod capture;
pub mod interaction;
pub mod kind;
pub mod snapshot;

/// Version stamped into every record for replay tooling.
pub const SCHEMA_VERSION: u32 = 1;

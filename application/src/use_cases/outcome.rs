//! Non-interference boundary shared by all recorder entry points.
//!
//! Every public recorder method runs its capture work through [`guarded`],
//! which turns both `Err` values and panics into a `warn!` event plus a
//! [`CaptureOutcome::Failed`]. Entry points that return something other
//! than an outcome use [`shielded`]. Nothing raised inside capture reaches
//! the host's call path.

use capture_domain::CaptureError;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Result of one capture attempt.
///
/// Hosts may inspect it for observability but should not branch their own
/// control flow on it.
#[derive(Debug)]
pub enum CaptureOutcome {
    /// The record was persisted at this path.
    Written(PathBuf),
    /// Capture failed; the failure was already logged as a warning.
    Failed(CaptureError),
    /// Capture is turned off in the configuration.
    Disabled,
}

impl CaptureOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, CaptureOutcome::Written(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, CaptureOutcome::Failed(_))
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            CaptureOutcome::Written(path) => Some(path),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&CaptureError> {
        match self {
            CaptureOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Run `capture`, downgrading any failure or panic to a warning.
pub(crate) fn guarded<F>(operation: &'static str, capture: F) -> CaptureOutcome
where
    F: FnOnce() -> Result<PathBuf, CaptureError>,
{
    match shielded(operation, capture) {
        Some(Ok(path)) => {
            debug!("{}: record written to {}", operation, path.display());
            CaptureOutcome::Written(path)
        }
        Some(Err(e)) => {
            warn!("{}: capture failed, continuing without record: {}", operation, e);
            CaptureOutcome::Failed(e)
        }
        None => CaptureOutcome::Failed(CaptureError::Panicked(operation)),
    }
}

/// Run `capture`, turning a panic into a warning and `None`.
pub(crate) fn shielded<T, F>(operation: &'static str, capture: F) -> Option<T>
where
    F: FnOnce() -> T,
{
    match panic::catch_unwind(AssertUnwindSafe(capture)) {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("{}: capture panicked, continuing without record", operation);
            None
        }
    }
}

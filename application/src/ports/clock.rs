//! Port for reading the current instant.
//!
//! Recorders take capture instants from a [`Clock`] so tests can pin time
//! (e.g. to force file-name collisions at millisecond granularity).

use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

//! Capture configuration: the knobs supplied by the host at construction.
//!
//! [`CaptureConfig`] groups the only runtime settings of the subsystem:
//! whether capture is on, where records land, and how much message text a
//! record may hold before it is truncated.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default character bound for captured message and response text.
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 30_000;

/// Directory name used under the system temp dir when none is configured.
pub const DEFAULT_LOG_DIR_NAME: &str = "llm_capture_logs";

/// `<system temp dir>/llm_capture_logs`
pub fn default_log_dir() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// When false, recorders return `Disabled` without touching the writer.
    pub enabled: bool,
    /// Root directory for record files; created on first write.
    pub log_dir: PathBuf,
    /// Maximum characters kept per message or response text.
    pub max_content_chars: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_dir: default_log_dir(),
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
        }
    }
}

impl CaptureConfig {
    // ==================== Builder Methods ====================

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    pub fn with_max_content_chars(mut self, max: usize) -> Self {
        self.max_content_chars = max;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn disabled() -> Self {
        Self::default().with_enabled(false)
    }
}

//! Application-level configuration.
//!
//! - [`CaptureConfig`]: capture on/off, record directory, content bound

pub mod capture_config;

pub use capture_config::{
    CaptureConfig, DEFAULT_LOG_DIR_NAME, DEFAULT_MAX_CONTENT_CHARS, default_log_dir,
};

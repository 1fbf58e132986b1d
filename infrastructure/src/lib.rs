//! Infrastructure layer for llm-capture
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod recorders;

// Re-export commonly used types
pub use config::{
    ConfigLoadError, ConfigLoader, ConfigValidationError, FileCaptureConfig, FileConfig,
};
pub use logging::JsonFileRecordWriter;
pub use recorders::CaptureRecorders;

//! Configuration file loading for llm-capture
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Explicitly specified file
//! 2. Project root: `./llm-capture.toml` or `./.llm-capture.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/llm-capture/config.toml`
//! 4. Default values

mod file_config;
mod loader;

pub use file_config::{ConfigValidationError, FileCaptureConfig, FileConfig};
pub use loader::{ConfigLoadError, ConfigLoader};

//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into the application's
//! [`CaptureConfig`] after validation.

use capture_application::config::{CaptureConfig, DEFAULT_MAX_CONTENT_CHARS, default_log_dir};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("capture.max_content_chars cannot be 0")]
    ZeroContentBound,

    #[error("capture.log_dir cannot be empty")]
    EmptyLogDir,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Capture settings
    pub capture: FileCaptureConfig,
}

/// Raw `[capture]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCaptureConfig {
    /// Write records at all
    pub enabled: bool,
    /// Record directory; `~` is expanded. Unset means the temp-dir default.
    pub log_dir: Option<String>,
    /// Character bound for message and response text
    pub max_content_chars: usize,
}

impl Default for FileCaptureConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_dir: None,
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
        }
    }
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.capture.max_content_chars == 0 {
            return Err(ConfigValidationError::ZeroContentBound);
        }

        if let Some(dir) = &self.capture.log_dir
            && dir.trim().is_empty()
        {
            return Err(ConfigValidationError::EmptyLogDir);
        }

        Ok(())
    }

    /// Validate and convert into the runtime configuration.
    pub fn to_capture_config(&self) -> Result<CaptureConfig, ConfigValidationError> {
        self.validate()?;

        let log_dir = match &self.capture.log_dir {
            Some(dir) => expand_home(dir.trim()),
            None => default_log_dir(),
        };

        Ok(CaptureConfig {
            enabled: self.capture.enabled,
            log_dir,
            max_content_chars: self.capture.max_content_chars,
        })
    }
}

/// Expand a leading `~` to the home directory.
///
/// Left unchanged when no home directory is known.
fn expand_home(path: &str) -> PathBuf {
    let rest = if path == "~" {
        Some("")
    } else {
        path.strip_prefix("~/")
    };

    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() => home,
        (Some(rest), Some(home)) => home.join(Path::new(rest)),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[capture]
enabled = false
log_dir = "/var/log/llm"
max_content_chars = 2000
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(!config.capture.enabled);
        assert_eq!(config.capture.log_dir.as_deref(), Some("/var/log/llm"));
        assert_eq!(config.capture.max_content_chars, 2000);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[capture]
max_content_chars = 10
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(config.capture.enabled);
        assert!(config.capture.log_dir.is_none());
        assert_eq!(config.capture.max_content_chars, 10);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config, FileConfig::default());

        let runtime = config.to_capture_config().unwrap();
        assert_eq!(runtime, CaptureConfig::default());
    }

    #[test]
    fn test_validate_rejects_zero_bound() {
        let mut config = FileConfig::default();
        config.capture.max_content_chars = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::ZeroContentBound)
        );
        assert!(config.to_capture_config().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_log_dir() {
        let mut config = FileConfig::default();
        config.capture.log_dir = Some("   ".to_string());
        assert_eq!(config.validate(), Err(ConfigValidationError::EmptyLogDir));
    }

    #[test]
    fn test_tilde_is_expanded() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(expand_home("~/logs/llm"), home.join("logs/llm"));
        assert_eq!(expand_home("~"), home);
        assert_eq!(expand_home("/abs/~/x"), PathBuf::from("/abs/~/x"));
        assert_eq!(expand_home("~other/x"), PathBuf::from("~other/x"));
    }
}

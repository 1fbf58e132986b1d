//! Core domain concepts shared across all subdomains.
//!
//! - [`error`]: validation, protocol and capture errors
//! - [`string`]: character-bounded text with truncation bookkeeping

pub mod error;
pub mod string;

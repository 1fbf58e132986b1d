//! Record kinds and their on-disk file stems.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind tag of a persisted record; also the file name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// A message-array snapshot taken when the conversation is flattened.
    RealMessages,
    /// One request/response exchange with a model backend.
    LlmInteraction,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::RealMessages => "real_messages",
            RecordKind::LlmInteraction => "llm_interaction",
        }
    }

    /// `{kind}_{YYYYMMDD}_{HHMMSS}_{mmm}` for the given capture instant.
    ///
    /// Derived from the record's own timestamp so names are reproducible.
    pub fn file_stem(&self, captured_at: &DateTime<Utc>) -> String {
        format!("{}_{}", self.as_str(), captured_at.format("%Y%m%d_%H%M%S_%3f"))
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_file_stem_format() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 7, 9, 5, 2).unwrap()
            + chrono::Duration::milliseconds(42);
        assert_eq!(
            RecordKind::RealMessages.file_stem(&ts),
            "real_messages_20250307_090502_042"
        );
        assert_eq!(
            RecordKind::LlmInteraction.file_stem(&ts),
            "llm_interaction_20250307_090502_042"
        );
    }

    #[test]
    fn test_kind_serde_matches_prefix() {
        for kind in [RecordKind::RealMessages, RecordKind::LlmInteraction] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }
}

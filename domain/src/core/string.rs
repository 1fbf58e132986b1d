//! String utilities for the domain layer.

use serde::{Deserialize, Serialize};

/// Appended to every piece of text cut down by [`bound_text`].
pub const TRUNCATION_MARKER: &str = "\n[... truncated ...]";

/// Bookkeeping left behind when captured text exceeded the character bound.
///
/// Counts are in Unicode scalar values, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Truncation {
    pub original_chars: usize,
    pub retained_chars: usize,
}

impl Truncation {
    /// Merge the bookkeeping of two independently bounded texts.
    pub fn combine(self, other: Truncation) -> Truncation {
        Truncation {
            original_chars: self.original_chars + other.original_chars,
            retained_chars: self.retained_chars + other.retained_chars,
        }
    }
}

/// Keep at most `max_chars` characters of `s` (UTF-8 safe).
///
/// When the text is cut, [`TRUNCATION_MARKER`] is appended after the
/// retained prefix and the original length is reported back. The marker
/// does not count against `max_chars`.
pub fn bound_text(s: &str, max_chars: usize) -> (String, Option<Truncation>) {
    let Some((end, _)) = s.char_indices().nth(max_chars) else {
        return (s.to_string(), None);
    };

    let original_chars = max_chars + s[end..].chars().count();
    let mut bounded = String::with_capacity(end + TRUNCATION_MARKER.len());
    bounded.push_str(&s[..end]);
    bounded.push_str(TRUNCATION_MARKER);

    (
        bounded,
        Some(Truncation {
            original_chars,
            retained_chars: max_chars,
        }),
    )
}

//! Message domain entities

use crate::core::string::{Truncation, bound_text};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a message in a chat-completion array.
///
/// The declaration order is also the key order of role distributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::System, Role::User, Role::Assistant, Role::Tool];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown role: {}", s))
    }
}

/// Reference to an image, kept in its already-encoded form (URL or data URI).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// One typed part of a mixed text/image message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn image(url: impl Into<String>) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: url.into(),
                detail: None,
            },
        }
    }

    /// Wire name of the part type (`"text"` or `"image_url"`).
    pub fn kind(&self) -> &'static str {
        match self {
            ContentPart::Text { .. } => "text",
            ContentPart::ImageUrl { .. } => "image_url",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentPart::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, ContentPart::ImageUrl { .. })
    }
}

/// Message content: either plain text or an ordered list of parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl Default for MessageContent {
    fn default() -> Self {
        MessageContent::Text(String::new())
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        MessageContent::Text(text.to_string())
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        MessageContent::Text(text)
    }
}

impl From<Vec<ContentPart>> for MessageContent {
    fn from(parts: Vec<ContentPart>) -> Self {
        MessageContent::Parts(parts)
    }
}

impl MessageContent {
    pub fn contains_image(&self) -> bool {
        match self {
            MessageContent::Text(_) => false,
            MessageContent::Parts(parts) => parts.iter().any(ContentPart::is_image),
        }
    }

    /// Plain text counts as a single `"text"` part.
    pub fn part_kinds(&self) -> Vec<&'static str> {
        match self {
            MessageContent::Text(_) => vec!["text"],
            MessageContent::Parts(parts) => parts.iter().map(ContentPart::kind).collect(),
        }
    }

    /// Number of characters across all text, images excluded.
    pub fn text_chars(&self) -> usize {
        match self {
            MessageContent::Text(text) => text.chars().count(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(ContentPart::as_text)
                .map(|t| t.chars().count())
                .sum(),
        }
    }

    /// Concatenated text of all text parts.
    pub fn joined_text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(ContentPart::as_text)
                .collect::<Vec<_>>()
                .join(""),
        }
    }

    /// Bound every text part to `max_chars`, leaving image parts untouched.
    pub fn bounded(self, max_chars: usize) -> (MessageContent, Option<Truncation>) {
        match self {
            MessageContent::Text(text) => {
                let (text, truncation) = bound_text(&text, max_chars);
                (MessageContent::Text(text), truncation)
            }
            MessageContent::Parts(parts) => {
                let mut any_cut = false;
                let mut total = Truncation {
                    original_chars: 0,
                    retained_chars: 0,
                };
                let parts = parts
                    .into_iter()
                    .map(|part| match part {
                        ContentPart::Text { text } => {
                            let (bounded, truncation) = bound_text(&text, max_chars);
                            let chars = text.chars().count();
                            let truncation = truncation.unwrap_or(Truncation {
                                original_chars: chars,
                                retained_chars: chars,
                            });
                            any_cut |= truncation.original_chars != truncation.retained_chars;
                            total = total.combine(truncation);
                            ContentPart::Text { text: bounded }
                        }
                        other => other,
                    })
                    .collect();
                (MessageContent::Parts(parts), any_cut.then_some(total))
            }
        }
    }
}

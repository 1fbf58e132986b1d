//! Captured view of a single chat-completion message.

use super::entities::{ContentPart, MessageContent, Role};
use super::tool_call::ToolCall;
use crate::core::string::Truncation;
use serde::{Deserialize, Serialize};

/// Debug metadata derived from a message's original content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDebugInfo {
    pub contains_image: bool,
    pub content_part_count: usize,
    pub content_part_types: Vec<String>,
    /// Text length before any truncation.
    pub content_chars: usize,
}

impl MessageDebugInfo {
    pub fn of(content: &MessageContent) -> Self {
        let kinds = content.part_kinds();
        Self {
            contains_image: content.contains_image(),
            content_part_count: kinds.len(),
            content_part_types: kinds.into_iter().map(str::to_string).collect(),
            content_chars: content.text_chars(),
        }
    }
}

/// One message as it appears in a captured record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageView {
    pub role: Role,
    pub content: MessageContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// Present only when content was cut to the configured bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truncation: Option<Truncation>,
    #[serde(
        default,
        rename = "_debug_info",
        skip_serializing_if = "Option::is_none"
    )]
    pub debug_info: Option<MessageDebugInfo>,
}

impl MessageView {
    pub fn new(role: Role, content: impl Into<MessageContent>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_call_id: None,
            tool_name: None,
            tool_calls: Vec::new(),
            truncation: None,
            debug_info: None,
        }
    }

    pub fn system(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Result of a tool execution, correlated with the call that requested it.
    pub fn tool(
        content: impl Into<MessageContent>,
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
    ) -> Self {
        let mut view = Self::new(Role::Tool, content);
        view.tool_call_id = Some(tool_call_id.into());
        view.tool_name = Some(tool_name.into());
        view
    }

    pub fn with_parts(role: Role, parts: Vec<ContentPart>) -> Self {
        Self::new(role, MessageContent::Parts(parts))
    }

    pub fn with_tool_calls(mut self, tool_calls: Vec<ToolCall>) -> Self {
        self.tool_calls = tool_calls;
        self
    }

    /// Attach debug metadata computed from the current content.
    pub fn with_debug_info(mut self) -> Self {
        self.debug_info = Some(MessageDebugInfo::of(&self.content));
        self
    }

    /// Cut content down to `max_chars`, recording the truncation if any.
    ///
    /// A view that was already bounded keeps its first `original_chars`;
    /// `retained_chars` always describes the current content.
    pub fn bounded(mut self, max_chars: usize) -> Self {
        let (content, truncation) = std::mem::take(&mut self.content).bounded(max_chars);
        self.content = content;
        self.truncation = match (self.truncation, truncation) {
            (Some(first), Some(latest)) => Some(Truncation {
                original_chars: first.original_chars,
                retained_chars: latest.retained_chars,
            }),
            (first, latest) => first.or(latest),
        };
        self
    }
}

//! Structured tool invocations emitted by a model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Arguments of a tool call.
///
/// Chat-completion backends send arguments as a JSON-encoded string,
/// content-block backends as a structured object. Both are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolArguments {
    Raw(String),
    Structured(Value),
}

impl ToolArguments {
    /// A JSON string always becomes [`ToolArguments::Raw`].
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(s) => ToolArguments::Raw(s),
            other => ToolArguments::Structured(other),
        }
    }

    /// Structured view of the arguments, parsing raw text when it is valid JSON.
    pub fn parsed(&self) -> Option<Value> {
        match self {
            ToolArguments::Raw(s) => serde_json::from_str(s).ok(),
            ToolArguments::Structured(v) => Some(v.clone()),
        }
    }
}

impl Default for ToolArguments {
    fn default() -> Self {
        ToolArguments::Raw(String::new())
    }
}

/// A tool invocation request (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Backend-assigned identifier used to correlate the tool result.
    pub id: String,
    /// Name of the tool the model wants to run.
    pub name: String,
    pub arguments: ToolArguments,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: ToolArguments::from_value(arguments),
        }
    }

    pub fn raw(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: ToolArguments::Raw(arguments.into()),
        }
    }
}

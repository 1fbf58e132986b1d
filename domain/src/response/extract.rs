//! Schema-tolerant extraction over backend responses.
//!
//! Response payloads differ across backends and versions, so extraction is
//! expressed as a capability set ([`ResponseView`]) rather than a closed
//! type. Every accessor is best-effort: a missing field yields `None` or an
//! empty list, never an error.
//!
//! # Supported shapes
//!
//! ```text
//! chat-completion:  { id, choices: [{ message: { content, tool_calls | function_call }, finish_reason }], usage: { prompt_tokens, completion_tokens } }
//! content-block:    { id, content: [{ type: "text" | "tool_use", ... }], stop_reason, usage: { input_tokens, output_tokens } }
//! ```

use crate::message::tool_call::{ToolArguments, ToolCall};
use crate::record::interaction::TokenUsage;
use serde_json::Value;

/// Capabilities a captured response may expose.
pub trait ResponseView {
    fn response_id(&self) -> Option<String>;

    /// Primary textual content; `None` for tool-call-only responses.
    fn content_text(&self) -> Option<String>;

    fn tool_calls(&self) -> Vec<ToolCall>;

    fn token_usage(&self) -> Option<TokenUsage>;

    fn finish_reason(&self) -> Option<String>;

    /// Unmodified payload, retained for forensic replay.
    fn raw(&self) -> Value;
}

impl ResponseView for Value {
    fn response_id(&self) -> Option<String> {
        self.get("id").and_then(Value::as_str).map(str::to_string)
    }

    fn content_text(&self) -> Option<String> {
        if let Some(message) = primary_message(self) {
            return message.get("content").and_then(text_of);
        }
        self.get("content")
            .and_then(Value::as_array)
            .and_then(|blocks| join_text_blocks(blocks))
    }

    fn tool_calls(&self) -> Vec<ToolCall> {
        if let Some(message) = primary_message(self) {
            let mut calls: Vec<ToolCall> = message
                .get("tool_calls")
                .and_then(Value::as_array)
                .map(|entries| entries.iter().filter_map(chat_tool_call).collect())
                .unwrap_or_default();

            // Legacy single function_call
            if calls.is_empty()
                && let Some(call) = message.get("function_call").and_then(named_function)
            {
                calls.push(call);
            }
            return calls;
        }

        self.get("content")
            .and_then(Value::as_array)
            .map(|blocks| blocks.iter().filter_map(tool_use_block).collect())
            .unwrap_or_default()
    }

    fn token_usage(&self) -> Option<TokenUsage> {
        let usage = self.get("usage")?;
        let prompt = count_field(usage, &["prompt_tokens", "input_tokens"])?;
        let completion = count_field(usage, &["completion_tokens", "output_tokens"])?;
        TokenUsage::new(prompt, completion)
    }

    fn finish_reason(&self) -> Option<String> {
        self.pointer("/choices/0/finish_reason")
            .or_else(|| self.get("stop_reason"))
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn raw(&self) -> Value {
        self.clone()
    }
}

fn primary_message(response: &Value) -> Option<&Value> {
    response.pointer("/choices/0/message")
}

/// Text of a `content` field: a plain string or a list of text parts.
fn text_of(content: &Value) -> Option<String> {
    match content {
        Value::String(s) => Some(s.clone()),
        Value::Array(parts) => join_text_blocks(parts),
        _ => None,
    }
}

fn join_text_blocks(blocks: &[Value]) -> Option<String> {
    let texts: Vec<&str> = blocks
        .iter()
        .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
        .filter_map(|b| b.get("text").and_then(Value::as_str))
        .collect();
    if texts.is_empty() {
        None
    } else {
        Some(texts.concat())
    }
}

fn chat_tool_call(entry: &Value) -> Option<ToolCall> {
    let mut call = named_function(entry.get("function")?)?;
    call.id = string_field(entry, "id");
    Some(call)
}

fn named_function(function: &Value) -> Option<ToolCall> {
    let name = function.get("name")?.as_str()?;
    let arguments = function
        .get("arguments")
        .cloned()
        .map(ToolArguments::from_value)
        .unwrap_or_default();
    Some(ToolCall {
        id: String::new(),
        name: name.to_string(),
        arguments,
    })
}

fn tool_use_block(block: &Value) -> Option<ToolCall> {
    if block.get("type").and_then(Value::as_str) != Some("tool_use") {
        return None;
    }
    let name = block.get("name")?.as_str()?;
    Some(ToolCall {
        id: string_field(block, "id"),
        name: name.to_string(),
        arguments: ToolArguments::from_value(block.get("input").cloned().unwrap_or(Value::Null)),
    })
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn count_field(usage: &Value, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|k| usage.get(*k).and_then(Value::as_u64))
}

//! Interaction record: one request/response exchange with a model backend.

use super::SCHEMA_VERSION;
use crate::core::error::ValidationError;
use crate::core::string::{Truncation, bound_text};
use crate::message::tool_call::ToolCall;
use crate::message::view::MessageView;
use crate::response::extract::ResponseView;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Backend-reported token accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl TokenUsage {
    /// `None` when the total does not fit in a `u64`.
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Option<Self> {
        Some(Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.checked_add(completion_tokens)?,
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.prompt_tokens.checked_add(self.completion_tokens) != Some(self.total_tokens) {
            return Err(ValidationError::TokenUsageMismatch {
                prompt: self.prompt_tokens,
                completion: self.completion_tokens,
                total: self.total_tokens,
            });
        }
        Ok(())
    }
}

/// Why an underlying model call failed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CallFailure {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Source chain of the originating error, outermost first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
}

impl CallFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: None,
            causes: Vec::new(),
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Capture an error and its `source()` chain.
    pub fn from_error(error: &(dyn std::error::Error + 'static)) -> Self {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }
        Self {
            message: error.to_string(),
            kind: None,
            causes,
        }
    }
}

impl From<&str> for CallFailure {
    fn from(message: &str) -> Self {
        CallFailure::new(message)
    }
}

impl From<String> for CallFailure {
    fn from(message: String) -> Self {
        CallFailure::new(message)
    }
}

/// Request half of an interaction, captured at `begin`.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionRequest {
    pub request_timestamp: DateTime<Utc>,
    pub model: String,
    pub messages: Vec<MessageView>,
    pub parameters: Map<String, Value>,
    pub function_calling_active: bool,
}

impl InteractionRequest {
    /// Normalize opaque call options into a parameter map.
    ///
    /// Objects are kept as-is, `null` means no options, anything else is
    /// stored under `"value"`.
    pub fn parameters_from(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        }
    }
}

/// Full record of a model call, successful or failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub schema_version: u32,
    pub request_timestamp: DateTime<Utc>,
    pub response_timestamp: DateTime<Utc>,
    pub latency_seconds: f64,
    pub model: String,
    pub request_messages: Vec<MessageView>,
    pub request_parameters: Map<String, Value>,
    pub function_calling_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_id: Option<String>,
    /// Empty when the response carried only tool calls, or the call failed.
    pub response_content_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_truncation: Option<Truncation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    pub tool_calls: Vec<ToolCall>,
    pub token_usage: Option<TokenUsage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<CallFailure>,
    pub raw_response: Value,
}

/// Seconds between two instants, at microsecond resolution.
pub fn latency_between(request: &DateTime<Utc>, response: &DateTime<Utc>) -> f64 {
    let elapsed = *response - *request;
    match elapsed.num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        None => elapsed.num_milliseconds() as f64 / 1_000.0,
    }
}

impl InteractionRecord {
    /// Assemble the record of a call that returned a response.
    ///
    /// Request messages and response text are cut to `max_chars`.
    pub fn completed<R: ResponseView + ?Sized>(
        request: InteractionRequest,
        response_timestamp: DateTime<Utc>,
        response: &R,
        max_chars: usize,
    ) -> Result<Self, ValidationError> {
        let (response_content_text, response_truncation) =
            match response.content_text() {
                Some(text) => bound_text(&text, max_chars),
                None => (String::new(), None),
            };

        let record = Self {
            response_id: response.response_id(),
            response_content_text,
            response_truncation,
            finish_reason: response.finish_reason(),
            tool_calls: response.tool_calls(),
            token_usage: response.token_usage(),
            error: None,
            raw_response: response.raw(),
            ..Self::skeleton(request, response_timestamp, max_chars)
        };
        record.validate()?;
        Ok(record)
    }

    /// Assemble the record of a call that failed before yielding a response.
    pub fn failed(
        request: InteractionRequest,
        response_timestamp: DateTime<Utc>,
        failure: CallFailure,
        max_chars: usize,
    ) -> Result<Self, ValidationError> {
        let record = Self {
            error: Some(failure),
            ..Self::skeleton(request, response_timestamp, max_chars)
        };
        record.validate()?;
        Ok(record)
    }

    fn skeleton(
        request: InteractionRequest,
        response_timestamp: DateTime<Utc>,
        max_chars: usize,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            latency_seconds: latency_between(&request.request_timestamp, &response_timestamp),
            request_timestamp: request.request_timestamp,
            response_timestamp,
            model: request.model,
            request_messages: request
                .messages
                .into_iter()
                .map(|m| m.bounded(max_chars))
                .collect(),
            request_parameters: request.parameters,
            function_calling_active: request.function_calling_active,
            response_id: None,
            response_content_text: String::new(),
            response_truncation: None,
            finish_reason: None,
            tool_calls: Vec::new(),
            token_usage: None,
            error: None,
            raw_response: Value::Null,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.response_timestamp < self.request_timestamp {
            return Err(ValidationError::ResponseBeforeRequest {
                request: self.request_timestamp,
                response: self.response_timestamp,
            });
        }

        let expected = latency_between(&self.request_timestamp, &self.response_timestamp);
        if (self.latency_seconds - expected).abs() > 1e-9 {
            return Err(ValidationError::LatencyMismatch {
                recorded: self.latency_seconds,
                expected,
            });
        }

        if let Some(usage) = &self.token_usage {
            usage.validate()?;
        }

        Ok(())
    }
}

//! Interaction use case: two-phase capture around one model call.
//!
//! ```text
//! host:      begin(..) ──► [ model call, owned by host ] ──► complete(h, response)
//!                                                       └──► fail(h, error)
//! recorder:  request instant        (no I/O)                 response instant,
//!            + copied request                                 extract, write
//! ```
//!
//! Any number of interactions may be open at once. Each [`InteractionHandle`]
//! carries its own identity, and `complete`/`fail` match on that identity
//! rather than on call order, so interleaved calls never cross-talk.

use super::outcome::{CaptureOutcome, guarded, shielded};
use crate::config::CaptureConfig;
use crate::ports::clock::{Clock, SystemClock};
use crate::ports::record_writer::RecordWriter;
use capture_domain::{
    CallFailure, CaptureError, CaptureRecord, InteractionRecord, InteractionRequest, MessageView,
    ProtocolError, ResponseView,
};
use chrono::{DateTime, SubsecRound, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

static NEXT_RECORDER_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque reference to an interaction opened with [`InteractionRecorder::begin`].
///
/// Handles are `Copy` so a stale or duplicated handle is expressible; using
/// one twice yields a [`ProtocolError`] that the recorder downgrades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InteractionHandle {
    recorder: u64,
    id: u64,
}

impl InteractionHandle {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl fmt::Display for InteractionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.recorder, self.id)
    }
}

pub struct InteractionRecorder {
    writer: Arc<dyn RecordWriter>,
    clock: Arc<dyn Clock>,
    enabled: bool,
    max_content_chars: usize,
    recorder_id: u64,
    next_id: AtomicU64,
    pending: Mutex<HashMap<u64, InteractionRequest>>,
}

impl InteractionRecorder {
    pub fn new(writer: Arc<dyn RecordWriter>, config: &CaptureConfig) -> Self {
        Self {
            writer,
            clock: Arc::new(SystemClock),
            enabled: config.enabled,
            max_content_chars: config.max_content_chars,
            recorder_id: NEXT_RECORDER_ID.fetch_add(1, Ordering::Relaxed),
            next_id: AtomicU64::new(1),
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Open an interaction before the host performs the model call.
    ///
    /// Captures the request instant and copies the request. Performs no I/O
    /// and always returns a handle, even when capture is disabled or the
    /// capture itself panics.
    ///
    /// `parameters` holds the recognized call options (temperature, max
    /// tokens, ...). An object is stored as-is, `null` means none, any other
    /// value is stored under `"value"`.
    pub fn begin(
        &self,
        model: &str,
        messages: &[MessageView],
        parameters: Value,
        function_calling_active: bool,
    ) -> InteractionHandle {
        let handle = InteractionHandle {
            recorder: self.recorder_id,
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
        };
        if !self.enabled {
            return handle;
        }

        // A request lost here surfaces later as an unknown handle
        shielded("begin", || {
            let request = InteractionRequest {
                request_timestamp: self.now(),
                model: model.to_string(),
                messages: messages.to_vec(),
                parameters: InteractionRequest::parameters_from(parameters),
                function_calling_active,
            };
            self.pending().insert(handle.id, request);
        });
        handle
    }

    /// Close an interaction with the backend's raw response.
    pub fn complete<R: ResponseView + ?Sized>(
        &self,
        handle: InteractionHandle,
        response: &R,
    ) -> CaptureOutcome {
        if !self.enabled {
            return CaptureOutcome::Disabled;
        }

        guarded("complete", || {
            let (request, response_timestamp) = self.take(handle)?;
            let record = InteractionRecord::completed(
                request,
                response_timestamp,
                response,
                self.max_content_chars,
            )?;
            self.writer.write(&CaptureRecord::Interaction(record))
        })
    }

    /// Close an interaction whose model call failed.
    ///
    /// A record is still written, with empty response text and `error` set,
    /// so failed calls leave no gap in the record stream.
    pub fn fail(&self, handle: InteractionHandle, failure: impl Into<CallFailure>) -> CaptureOutcome {
        if !self.enabled {
            return CaptureOutcome::Disabled;
        }

        let failure = failure.into();
        guarded("fail", || {
            let (request, response_timestamp) = self.take(handle)?;
            let record = InteractionRecord::failed(
                request,
                response_timestamp,
                failure,
                self.max_content_chars,
            )?;
            self.writer.write(&CaptureRecord::Interaction(record))
        })
    }

    /// Number of interactions begun but not yet completed or failed.
    pub fn open_interactions(&self) -> usize {
        self.pending().len()
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now().trunc_subsecs(3)
    }

    fn pending(&self) -> MutexGuard<'_, HashMap<u64, InteractionRequest>> {
        // A panic while holding the lock leaves the map itself consistent
        match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Remove the pending request for `handle` and stamp the response instant.
    fn take(
        &self,
        handle: InteractionHandle,
    ) -> Result<(InteractionRequest, DateTime<Utc>), CaptureError> {
        if handle.recorder != self.recorder_id {
            return Err(ProtocolError::ForeignHandle {
                handle: handle.to_string(),
                issuer: handle.recorder,
                recorder: self.recorder_id,
            }
            .into());
        }

        let request = self
            .pending()
            .remove(&handle.id)
            .ok_or_else(|| ProtocolError::UnknownHandle(handle.to_string()))?;

        let response_timestamp = self.now();
        if response_timestamp < request.request_timestamp {
            return Err(ProtocolError::CompletedBeforeBegin {
                handle: handle.to_string(),
                began: request.request_timestamp,
                completed: response_timestamp,
            }
            .into());
        }

        Ok((request, response_timestamp))
    }
}

impl Drop for InteractionRecorder {
    fn drop(&mut self) {
        let open = self.open_interactions();
        if open > 0 {
            warn!(
                "Interaction recorder dropped with {} open interaction(s); their records are lost",
                open
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::record_writer::InMemoryRecordWriter;
    use capture_domain::{TokenUsage, ToolArguments};
    use chrono::{Duration, TimeZone};
    use serde_json::json;
    use std::collections::VecDeque;

    /// Returns queued instants in order, repeating the last one.
    struct ScriptedClock(Mutex<VecDeque<DateTime<Utc>>>);

    impl ScriptedClock {
        fn new(instants: Vec<DateTime<Utc>>) -> Arc<Self> {
            Arc::new(Self(Mutex::new(instants.into())))
        }
    }

    impl Clock for ScriptedClock {
        fn now(&self) -> DateTime<Utc> {
            let mut queue = self.0.lock().unwrap();
            if queue.len() > 1 {
                queue.pop_front().unwrap()
            } else {
                *queue.front().unwrap()
            }
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 6, 7, 8, 9).unwrap()
    }

    fn two_messages() -> Vec<MessageView> {
        vec![
            MessageView::system("You are a helpful assistant."),
            MessageView::user("This is a test message."),
        ]
    }

    fn interactions(writer: &InMemoryRecordWriter) -> Vec<InteractionRecord> {
        writer
            .records()
            .into_iter()
            .map(|r| match r {
                CaptureRecord::Interaction(r) => r,
                other => panic!("expected interaction, got {:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_begin_complete_with_usage() {
        let writer = Arc::new(InMemoryRecordWriter::new());
        let recorder = InteractionRecorder::new(writer.clone(), &CaptureConfig::default())
            .with_clock(ScriptedClock::new(vec![t0(), t0() + Duration::milliseconds(500)]));

        let handle = recorder.begin("gpt-x", &two_messages(), json!({"temperature": 0.1}), false);
        assert_eq!(recorder.open_interactions(), 1);

        let response = json!({
            "id": "mock_response_123",
            "choices": [{"message": {"role": "assistant", "content": "Hello!"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 25, "completion_tokens": 15, "total_tokens": 40}
        });
        let outcome = recorder.complete(handle, &response);

        assert_eq!(
            outcome.path().unwrap().to_str().unwrap(),
            "memory/llm_interaction_20250506_070809_000.json"
        );
        assert_eq!(recorder.open_interactions(), 0);

        let records = interactions(&writer);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.model, "gpt-x");
        assert_eq!(record.token_usage, TokenUsage::new(25, 15));
        assert_eq!(record.token_usage.unwrap().total_tokens, 40);
        assert!(record.tool_calls.is_empty());
        assert_eq!(record.latency_seconds, 0.5);
        assert_eq!(
            record.latency_seconds,
            capture_domain::latency_between(&record.request_timestamp, &record.response_timestamp)
        );
        assert!(!record.function_calling_active);
        assert_eq!(record.request_messages.len(), 2);
        assert_eq!(record.request_parameters["temperature"], json!(0.1));
    }

    #[test]
    fn test_tool_call_only_response() {
        let writer = Arc::new(InMemoryRecordWriter::new());
        let recorder = InteractionRecorder::new(writer.clone(), &CaptureConfig::default());

        let handle = recorder.begin("gpt-x", &two_messages(), Value::Null, true);
        let response = json!({
            "choices": [{"message": {"content": null, "tool_calls": [
                {"id": "call_1", "type": "function", "function": {"name": "execute_bash", "arguments": "{\"command\":\"ls -la\"}"}}
            ]}, "finish_reason": "tool_calls"}]
        });
        assert!(recorder.complete(handle, &response).is_written());

        let record = &interactions(&writer)[0];
        assert_eq!(record.response_content_text, "");
        assert_eq!(record.tool_calls.len(), 1);
        assert_eq!(record.tool_calls[0].name, "execute_bash");
        assert_eq!(
            record.tool_calls[0].arguments,
            ToolArguments::Raw("{\"command\":\"ls -la\"}".to_string())
        );
        assert!(record.function_calling_active);
        assert!(record.request_parameters.is_empty());
        assert_eq!(record.token_usage, None);
    }

    #[test]
    fn test_fail_still_emits_record() {
        let writer = Arc::new(InMemoryRecordWriter::new());
        let recorder = InteractionRecorder::new(writer.clone(), &CaptureConfig::default());

        let handle = recorder.begin("gpt-x", &two_messages(), json!({}), false);
        let outcome = recorder.fail(handle, "AuthenticationError: invalid api key");
        assert!(outcome.is_written());

        let record = &interactions(&writer)[0];
        assert!(record.is_failure());
        assert_eq!(record.response_content_text, "");
        assert_eq!(
            record.error.as_ref().unwrap().message,
            "AuthenticationError: invalid api key"
        );
        assert!(record.latency_seconds >= 0.0);
    }

    #[test]
    fn test_double_complete_is_protocol_error() {
        let writer = Arc::new(InMemoryRecordWriter::new());
        let recorder = InteractionRecorder::new(writer.clone(), &CaptureConfig::default());

        let handle = recorder.begin("gpt-x", &[], Value::Null, false);
        assert!(recorder.complete(handle, &json!({})).is_written());

        let second = recorder.complete(handle, &json!({}));
        assert!(second.error().unwrap().is_protocol());
        let after_fail = recorder.fail(handle, "late failure");
        assert!(after_fail.error().unwrap().is_protocol());
        assert_eq!(writer.len(), 1);
    }

    #[test]
    fn test_foreign_handle_is_rejected() {
        let writer = Arc::new(InMemoryRecordWriter::new());
        let a = InteractionRecorder::new(writer.clone(), &CaptureConfig::default());
        let b = InteractionRecorder::new(writer.clone(), &CaptureConfig::default());

        let handle = a.begin("gpt-x", &[], Value::Null, false);
        let outcome = b.complete(handle, &json!({}));
        match outcome.error() {
            Some(CaptureError::Protocol(ProtocolError::ForeignHandle { .. })) => {}
            other => panic!("expected foreign handle error, got {:?}", other),
        }
        // The handle is still open on its own recorder
        assert_eq!(a.open_interactions(), 1);
        assert!(a.complete(handle, &json!({})).is_written());
    }

    #[test]
    fn test_clock_going_backwards_is_protocol_error() {
        let writer = Arc::new(InMemoryRecordWriter::new());
        let recorder = InteractionRecorder::new(writer.clone(), &CaptureConfig::default())
            .with_clock(ScriptedClock::new(vec![t0(), t0() - Duration::seconds(1)]));

        let handle = recorder.begin("gpt-x", &[], Value::Null, false);
        let outcome = recorder.complete(handle, &json!({}));
        match outcome.error() {
            Some(CaptureError::Protocol(ProtocolError::CompletedBeforeBegin { .. })) => {}
            other => panic!("expected completed-before-begin, got {:?}", other),
        }
        assert!(writer.is_empty());
    }

    #[test]
    fn test_interleaved_handles_do_not_cross_talk() {
        let writer = Arc::new(InMemoryRecordWriter::new());
        let recorder = InteractionRecorder::new(writer.clone(), &CaptureConfig::default());

        let first = recorder.begin("model-a", &[MessageView::user("a")], Value::Null, false);
        let second = recorder.begin("model-b", &[MessageView::user("b")], Value::Null, false);
        assert_ne!(first, second);

        // Complete in reverse order
        recorder.complete(second, &json!({"choices": [{"message": {"content": "reply-b"}}]}));
        recorder.complete(first, &json!({"choices": [{"message": {"content": "reply-a"}}]}));

        let records = interactions(&writer);
        assert_eq!(records[0].model, "model-b");
        assert_eq!(records[0].response_content_text, "reply-b");
        assert_eq!(records[1].model, "model-a");
        assert_eq!(records[1].response_content_text, "reply-a");
    }

    #[test]
    fn test_request_messages_are_copied_at_begin() {
        let writer = Arc::new(InMemoryRecordWriter::new());
        let recorder = InteractionRecorder::new(writer.clone(), &CaptureConfig::default());

        let mut messages = two_messages();
        let handle = recorder.begin("gpt-x", &messages, Value::Null, false);
        messages.push(MessageView::assistant("added after the call began"));
        recorder.complete(handle, &json!({}));

        assert_eq!(interactions(&writer)[0].request_messages.len(), 2);
    }

    struct PanickingClock;

    impl Clock for PanickingClock {
        fn now(&self) -> DateTime<Utc> {
            panic!("clock source unavailable")
        }
    }

    #[test]
    fn test_begin_survives_panicking_clock() {
        let writer = Arc::new(InMemoryRecordWriter::new());
        let recorder = InteractionRecorder::new(writer.clone(), &CaptureConfig::default())
            .with_clock(Arc::new(PanickingClock));

        let handle = recorder.begin("gpt-x", &two_messages(), Value::Null, false);
        assert_eq!(recorder.open_interactions(), 0);

        let outcome = recorder.complete(handle, &json!({}));
        match outcome.error() {
            Some(CaptureError::Protocol(ProtocolError::UnknownHandle(_))) => {}
            other => panic!("expected unknown handle, got {:?}", other),
        }
        assert!(writer.is_empty());
    }

    #[test]
    fn test_disabled_recorder() {
        let writer = Arc::new(InMemoryRecordWriter::new());
        let recorder = InteractionRecorder::new(writer.clone(), &CaptureConfig::disabled());

        let handle = recorder.begin("gpt-x", &[], Value::Null, false);
        assert_eq!(recorder.open_interactions(), 0);
        assert!(matches!(
            recorder.complete(handle, &json!({})),
            CaptureOutcome::Disabled
        ));
        assert!(matches!(recorder.fail(handle, "x"), CaptureOutcome::Disabled));
        assert!(writer.is_empty());
    }
}

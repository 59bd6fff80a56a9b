//! Server-Sent Events (SSE) codec for streamed task progress
//!
//! Each SSE event carries one [`TaskEvent`] as JSON in its `data` field and
//! names the event kind in its `event` field. A stream that fails on the
//! server ends with an `error` event whose data is `{"message": ...}`.

use eventsource_stream::Eventsource;
use futures::stream::{Stream, StreamExt};
use serde_json::Value;

use crate::protocol::{error::A2AError, event::TaskEvent};

/// SSE event name used for stream-level failures
pub const ERROR_EVENT: &str = "error";

/// SSE codec for parsing streaming responses
#[derive(Debug, Clone, Default)]
pub struct SseCodec;

impl SseCodec {
    /// Create a new SSE codec
    pub fn new() -> Self {
        Self
    }

    /// Parse an SSE byte stream into a stream of task events
    ///
    /// This method takes a byte stream (typically from reqwest) and parses it
    /// into the task events sent by the agent.
    pub fn parse_stream<S>(
        &self,
        byte_stream: S,
    ) -> impl Stream<Item = Result<TaskEvent, A2AError>> + Send + 'static
    where
        S: Stream<Item = Result<bytes::Bytes, reqwest::Error>> + Send + 'static,
    {
        byte_stream.eventsource().map(|result| match result {
            Ok(event) if event.event == ERROR_EVENT => {
                let message = serde_json::from_str::<Value>(&event.data)
                    .ok()
                    .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
                    .unwrap_or(event.data);
                Err(A2AError::Protocol(format!("SSE stream error: {}", message)))
            }
            Ok(event) => serde_json::from_str::<TaskEvent>(&event.data).map_err(|e| {
                A2AError::Protocol(format!("Failed to parse SSE event data: {}", e))
            }),
            Err(e) => Err(A2AError::Transport(format!("SSE stream error: {}", e))),
        })
    }
}

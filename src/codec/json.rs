//! JSON codec for HTTP+JSON binding

use std::sync::Arc;

use bytes::Bytes;

use crate::{
    codec::Codec,
    protocol::{
        agent::AgentCard,
        error::A2AError,
        operation::A2AOperation,
        task::{Task, TaskListResponse},
    },
    service::response::A2AResponse,
};

/// JSON codec for the HTTP+JSON protocol binding
#[derive(Debug, Clone, Default)]
pub struct JsonCodec;

impl JsonCodec {
    /// Create a new JSON codec
    pub fn new() -> Self {
        Self
    }
}

impl Codec for JsonCodec {
    fn encode_request(&self, operation: &A2AOperation) -> Result<Bytes, A2AError> {
        let json = match operation {
            A2AOperation::CreateTask { request, .. } => serde_json::to_value(request)?,
            A2AOperation::SendFollowUp { message, .. } => serde_json::to_value(message)?,
            // GET requests carry everything in the path and query
            _ => return Ok(Bytes::new()),
        };

        let bytes = serde_json::to_vec(&json)?;
        Ok(Bytes::from(bytes))
    }

    fn decode_response(
        &self,
        body: &[u8],
        operation: &A2AOperation,
    ) -> Result<A2AResponse, A2AError> {
        if body.is_empty() {
            return Ok(A2AResponse::Empty);
        }

        match operation {
            A2AOperation::CreateTask { stream: true, .. } => Err(A2AError::Protocol(
                "streamed task creation must be read as an event stream".to_string(),
            )),
            A2AOperation::CreateTask { .. }
            | A2AOperation::GetTask { .. }
            | A2AOperation::SendFollowUp { .. } => {
                let task: Task = serde_json::from_slice(body)?;
                Ok(A2AResponse::Task(Box::new(task)))
            }
            A2AOperation::ListTasks { .. } => {
                let list: TaskListResponse = serde_json::from_slice(body)?;
                Ok(A2AResponse::TaskList {
                    tasks: list.tasks,
                    total: list.total,
                })
            }
            A2AOperation::DiscoverAgent => {
                let card: AgentCard = serde_json::from_slice(body)?;
                Ok(A2AResponse::AgentCard(Arc::new(card)))
            }
        }
    }

    fn content_type(&self) -> &str {
        "application/json"
    }
}

//! A2A service response types

use std::{
    fmt,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use futures::stream::{BoxStream, Stream, StreamExt};
use tokio::sync::mpsc;

use crate::protocol::{agent::AgentCard, error::A2AError, event::TaskEvent, task::Task};

/// Response from an A2A service operation
#[derive(Debug)]
pub enum A2AResponse {
    /// Task response (from CreateTask, GetTask, SendFollowUp)
    Task(Box<Task>),

    /// Task list response (from ListTasks)
    TaskList {
        /// The tasks matching the query
        tasks: Vec<Task>,

        /// Number of tasks returned
        total: usize,
    },

    /// Agent card response (from DiscoverAgent)
    AgentCard(Arc<AgentCard>),

    /// Progress events (from streamed CreateTask)
    Stream(TaskEventStream),

    /// Empty response (for operations with no return value)
    Empty,
}

impl A2AResponse {
    /// Extract a task from the response, if present
    pub fn into_task(self) -> Option<Task> {
        match self {
            A2AResponse::Task(task) => Some(*task),
            _ => None,
        }
    }

    /// Extract a task list from the response, if present
    pub fn into_task_list(self) -> Option<Vec<Task>> {
        match self {
            A2AResponse::TaskList { tasks, .. } => Some(tasks),
            _ => None,
        }
    }

    /// Extract an agent card from the response, if present
    pub fn into_agent_card(self) -> Option<Arc<AgentCard>> {
        match self {
            A2AResponse::AgentCard(card) => Some(card),
            _ => None,
        }
    }

    /// Extract an event stream from the response, if present
    pub fn into_stream(self) -> Option<TaskEventStream> {
        match self {
            A2AResponse::Stream(stream) => Some(stream),
            _ => None,
        }
    }

    /// Check if the response is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, A2AResponse::Empty)
    }
}

/// Stream of progress events for one task
///
/// Ends after the final status update.
pub struct TaskEventStream {
    inner: BoxStream<'static, Result<TaskEvent, A2AError>>,
}

impl TaskEventStream {
    /// Wrap any event stream
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<TaskEvent, A2AError>> + Send + 'static,
    {
        Self {
            inner: stream.boxed(),
        }
    }

    /// Stream the events sent on a channel until it closes
    pub fn from_receiver(receiver: mpsc::Receiver<Result<TaskEvent, A2AError>>) -> Self {
        Self::new(futures::stream::unfold(receiver, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        }))
    }

    /// Drain the stream, returning every event
    pub async fn collect_events(mut self) -> Result<Vec<TaskEvent>, A2AError> {
        let mut events = Vec::new();
        while let Some(event) = self.next().await {
            events.push(event?);
        }
        Ok(events)
    }
}

impl Stream for TaskEventStream {
    type Item = Result<TaskEvent, A2AError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl fmt::Debug for TaskEventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskEventStream").finish_non_exhaustive()
    }
}

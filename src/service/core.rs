//! Task service: the server side of the A2A protocol

use std::{
    future::Future,
    panic::AssertUnwindSafe,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::Duration,
};

use futures::FutureExt;
use tokio::sync::mpsc;
use tower_service::Service;
use uuid::Uuid;

use crate::{
    handler::{HandlerContext, HandlerOutcome, HandlerRegistry, TaskHandler},
    protocol::{
        error::{A2AError, A2AResult, TaskError},
        event::TaskEvent,
        message::Message,
        operation::A2AOperation,
        task::{CreateTaskRequest, Task, TaskStatus},
        AgentCard,
    },
    service::{A2ARequest, A2AResponse, AgentCardRegistry, TaskEventStream},
    store::{InMemoryTaskStore, TaskStore},
};

/// Default number of tasks returned by a list without a limit
pub const DEFAULT_LIST_LIMIT: u32 = 100;

const EVENT_BUFFER: usize = 16;

/// Accepts work, runs the skill handler, and tracks the outcome
///
/// Every task follows `created → processing → completed | failed | input-required`.
/// Handler errors, panics and timeouts are recorded on the task as a failure;
/// only request-level problems (unknown skill, unknown task id, storage
/// errors) are returned as `Err`.
///
/// The service is cheap to clone; clones share the same store and handlers.
/// It also implements Tower's `Service<A2ARequest>` so middleware layers can
/// be stacked in front of it.
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
    handlers: Arc<HandlerRegistry>,
    cards: AgentCardRegistry,
    handler_timeout: Option<Duration>,
}

impl TaskService {
    /// Create a service backed by an unbounded in-memory store
    pub fn new(handlers: HandlerRegistry, cards: AgentCardRegistry) -> Self {
        Self {
            store: Arc::new(InMemoryTaskStore::new()),
            handlers: Arc::new(handlers),
            cards,
            handler_timeout: None,
        }
    }

    /// Use a different task store
    pub fn with_store(mut self, store: Arc<dyn TaskStore>) -> Self {
        self.store = store;
        self
    }

    /// Fail tasks whose handler runs longer than `timeout`
    pub fn with_handler_timeout(mut self, timeout: Duration) -> Self {
        self.handler_timeout = Some(timeout);
        self
    }

    /// The agent card
    pub fn get_card(&self) -> Arc<AgentCard> {
        self.cards.get_card()
    }

    /// Create a task and run it to an outcome before returning
    ///
    /// # Errors
    ///
    /// Returns `A2AError::Validation` for an unknown skill id, or a storage error
    pub async fn create_task(&self, request: CreateTaskRequest) -> A2AResult<Task> {
        let (task, handler) = self.admit(request).await?;
        self.execute(task, handler, None).await
    }

    /// Create a task and run it in the background, streaming its progress
    ///
    /// Returns the new task id and a stream that starts with the `created`
    /// status update and ends with the final one, or with an error item when
    /// the task could not be stored.
    pub async fn create_task_streaming(
        &self,
        request: CreateTaskRequest,
    ) -> A2AResult<(String, TaskEventStream)> {
        let (task, handler) = self.admit(request).await?;
        let task_id = task.id.clone();

        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let _ = tx.try_send(Ok(TaskEvent::status(&task_id, TaskStatus::Created)));

        let service = self.clone();
        tokio::spawn(async move {
            if let Err(err) = service.execute(task, handler, Some(&tx)).await {
                let _ = tx.send(Err(err)).await;
            }
        });

        Ok((task_id, TaskEventStream::from_receiver(rx)))
    }

    /// Current snapshot of a task
    ///
    /// # Errors
    ///
    /// Returns `A2AError::TaskNotFound` if the id is unknown
    pub async fn get_task(&self, task_id: &str) -> A2AResult<Task> {
        self.store
            .get(task_id)
            .await?
            .ok_or_else(|| A2AError::TaskNotFound {
                task_id: task_id.to_string(),
            })
    }

    /// Accept a follow-up message for an existing task
    ///
    /// The task is returned unchanged: there is no resume protocol for
    /// `input-required` tasks yet.
    pub async fn send_follow_up(&self, task_id: &str, message: Message) -> A2AResult<Task> {
        let task = self.get_task(task_id).await?;
        tracing::debug!(
            task_id = %task_id,
            status = %task.status,
            parts = message.parts.len(),
            "follow-up received"
        );
        Ok(task)
    }

    /// Most recent tasks first, optionally filtered by status
    pub async fn list_tasks(
        &self,
        status: Option<TaskStatus>,
        limit: Option<u32>,
    ) -> A2AResult<Vec<Task>> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT) as usize;
        self.store.list(status, limit).await
    }

    /// Resolve the handler and store the task in `created`
    async fn admit(&self, request: CreateTaskRequest) -> A2AResult<(Task, Arc<dyn TaskHandler>)> {
        let handler = self.handlers.resolve(request.skill_id.as_deref())?;

        let mut task = Task::new(Uuid::now_v7().to_string(), request.message);
        task.skill_id = request.skill_id;
        self.store.insert(task.clone()).await?;

        tracing::info!(
            task_id = %task.id,
            skill_id = task.skill_id.as_deref().unwrap_or("default"),
            "task created"
        );
        Ok((task, handler))
    }

    /// Drive a created task to its outcome and store every transition
    ///
    /// When a store write fails part way, one last write records the task as
    /// failed so it is never left in `processing`, and the error is returned.
    async fn execute(
        &self,
        task: Task,
        handler: Arc<dyn TaskHandler>,
        events: Option<&EventSender>,
    ) -> A2AResult<Task> {
        let admitted = task.clone();
        match self.run_to_outcome(task, handler, events).await {
            Ok(task) => Ok(task),
            Err(err) => {
                tracing::error!(task_id = %admitted.id, error = %err, "task aborted");
                self.record_store_failure(admitted, &err).await;
                Err(err)
            }
        }
    }

    async fn run_to_outcome(
        &self,
        mut task: Task,
        handler: Arc<dyn TaskHandler>,
        events: Option<&EventSender>,
    ) -> A2AResult<Task> {
        task.transition(TaskStatus::Processing)?;
        self.store.insert(task.clone()).await?;
        emit(events, TaskEvent::status(&task.id, TaskStatus::Processing)).await;

        let mut artifact = None;
        match task.message.text_content() {
            None => task.fail(TaskError::no_text_content())?,
            Some(input) => {
                let ctx = HandlerContext {
                    task_id: task.id.clone(),
                    message: task.message.clone(),
                };

                match self.run_handler(handler.as_ref(), &input, &ctx).await {
                    Ok(HandlerOutcome::Completed(result)) => {
                        artifact = Some(task.complete(result)?.clone());
                    }
                    Ok(HandlerOutcome::InputRequired(reason)) => task.require_input(reason)?,
                    Err(error) => task.fail(error)?,
                }
            }
        }

        self.store.insert(task.clone()).await?;
        tracing::info!(task_id = %task.id, status = %task.status, "task finished");
        if let Some(artifact) = artifact {
            emit(events, TaskEvent::artifact(&task.id, artifact)).await;
        }
        emit(events, TaskEvent::status(&task.id, task.status)).await;

        Ok(task)
    }

    /// Best-effort write of a failed record for a task whose run was aborted
    async fn record_store_failure(&self, mut task: Task, cause: &A2AError) {
        let error = TaskError::new(
            TaskError::STORE_FAILED,
            format!("task could not be stored: {}", cause),
        );
        if task.transition(TaskStatus::Processing).is_err() || task.fail(error).is_err() {
            return;
        }
        if let Err(err) = self.store.insert(task).await {
            tracing::error!(error = %err, "failed to record task failure");
        }
    }

    /// Run a handler, turning errors, panics and timeouts into a task error
    async fn run_handler(
        &self,
        handler: &dyn TaskHandler,
        input: &str,
        ctx: &HandlerContext,
    ) -> Result<HandlerOutcome, TaskError> {
        let run = AssertUnwindSafe(handler.handle(input, ctx)).catch_unwind();

        let result = match self.handler_timeout {
            Some(limit) => match tokio::time::timeout(limit, run).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(task_id = %ctx.task_id, ?limit, "handler timed out");
                    return Err(TaskError::new(
                        TaskError::HANDLER_TIMEOUT,
                        format!("handler timed out after {}ms", limit.as_millis()),
                    ));
                }
            },
            None => run.await,
        };

        match result {
            Ok(Ok(outcome)) => Ok(outcome),
            Ok(Err(err)) => {
                tracing::warn!(task_id = %ctx.task_id, error = %err, "handler failed");
                let message = format!("{:#}", err);
                let message = if message.trim().is_empty() {
                    "handler failed".to_string()
                } else {
                    message
                };
                Err(TaskError::new(TaskError::HANDLER_FAILED, message))
            }
            Err(_) => {
                tracing::error!(task_id = %ctx.task_id, "handler panicked");
                Err(TaskError::new(TaskError::HANDLER_FAILED, "handler panicked"))
            }
        }
    }

    /// Execute one protocol operation
    pub async fn dispatch(&self, operation: A2AOperation) -> A2AResult<A2AResponse> {
        match operation {
            A2AOperation::DiscoverAgent => Ok(A2AResponse::AgentCard(self.get_card())),
            A2AOperation::CreateTask {
                request,
                stream: false,
            } => Ok(A2AResponse::Task(Box::new(self.create_task(request).await?))),
            A2AOperation::CreateTask {
                request,
                stream: true,
            } => {
                let (_, stream) = self.create_task_streaming(request).await?;
                Ok(A2AResponse::Stream(stream))
            }
            A2AOperation::GetTask { task_id } => {
                Ok(A2AResponse::Task(Box::new(self.get_task(&task_id).await?)))
            }
            A2AOperation::SendFollowUp { task_id, message } => Ok(A2AResponse::Task(Box::new(
                self.send_follow_up(&task_id, message).await?,
            ))),
            A2AOperation::ListTasks { status, limit } => {
                let tasks = self.list_tasks(status, limit).await?;
                Ok(A2AResponse::TaskList {
                    total: tasks.len(),
                    tasks,
                })
            }
        }
    }
}

type EventSender = mpsc::Sender<A2AResult<TaskEvent>>;

async fn emit(events: Option<&EventSender>, event: TaskEvent) {
    if let Some(tx) = events {
        // a dropped receiver only means nobody is listening any more
        let _ = tx.send(Ok(event)).await;
    }
}

impl Service<A2ARequest> for TaskService {
    type Response = A2AResponse;
    type Error = A2AError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: A2ARequest) -> Self::Future {
        let service = self.clone();
        Box::pin(async move { service.dispatch(req.operation).await })
    }
}

impl std::fmt::Debug for TaskService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskService")
            .field("handlers", &self.handlers)
            .field("handler_timeout", &self.handler_timeout)
            .finish_non_exhaustive()
    }
}

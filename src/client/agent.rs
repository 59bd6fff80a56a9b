//! High-level A2A agent client

use std::{sync::Arc, time::Duration};

use tower::ServiceExt;
use tower_service::Service;

use crate::{
    client::config::ClientConfig,
    layer::validation::validate_response,
    protocol::{
        error::A2AError, A2AOperation, AgentCard, CreateTaskRequest, Message, Task, TaskStatus,
    },
    service::{A2ARequest, A2AResponse, TaskEventStream},
};

/// High-level A2A client for interacting with agents
///
/// This client wraps a Tower service and provides convenient methods for common A2A operations.
/// The service is generic over any implementation that satisfies the Service trait bounds.
///
/// # Example
///
/// ```rust,no_run
/// use tower_a2a_server::prelude::*;
///
/// # async fn example() -> Result<(), A2AError> {
/// let url = "http://127.0.0.1:8000".parse().unwrap();
/// let mut client = A2AClientBuilder::new_http(url).build();
///
/// let task = client.create_task(Message::user("We guarantee returns")).await?;
/// println!("Task {} is {}", task.id, task.status);
/// # Ok(())
/// # }
/// ```
pub struct AgentClient<S> {
    service: S,
    config: ClientConfig,
}

impl<S> AgentClient<S>
where
    S: Service<A2ARequest, Response = A2AResponse, Error = A2AError>,
{
    /// Create a new agent client
    ///
    /// # Arguments
    ///
    /// * `service` - The Tower service that handles requests
    /// * `config` - Client configuration
    pub fn new(service: S, config: ClientConfig) -> Self {
        Self { service, config }
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn execute(&mut self, operation: A2AOperation) -> Result<A2AResponse, A2AError> {
        let request = A2ARequest::new(operation, self.config.request_context());
        let response = self.service.ready().await?.call(request).await?;

        if self.config.validate_responses {
            validate_response(&response)?;
        }
        Ok(response)
    }

    async fn execute_for_task(
        &mut self,
        operation: A2AOperation,
        context: &str,
    ) -> Result<Task, A2AError> {
        self.execute(operation).await?.into_task().ok_or_else(|| {
            A2AError::Protocol(format!("Expected task response from {}", context))
        })
    }

    /// Discover agent capabilities by fetching the Agent Card
    ///
    /// This retrieves the agent's metadata from `/.well-known/agent.json`
    pub async fn discover(&mut self) -> Result<AgentCard, A2AError> {
        let card = self
            .execute(A2AOperation::DiscoverAgent)
            .await?
            .into_agent_card()
            .ok_or_else(|| {
                A2AError::Protocol("Expected agent card response from discover".into())
            })?;

        Ok(Arc::unwrap_or_clone(card))
    }

    /// Submit a message to the agent's default skill
    ///
    /// Returns once the agent has run the task to an outcome. A task that
    /// failed is still returned as `Ok`; inspect its status and error.
    pub async fn create_task(&mut self, message: Message) -> Result<Task, A2AError> {
        self.submit(CreateTaskRequest::new(message)).await
    }

    /// Submit a message to a specific skill
    pub async fn create_task_for_skill(
        &mut self,
        message: Message,
        skill_id: impl Into<String>,
    ) -> Result<Task, A2AError> {
        self.submit(CreateTaskRequest::for_skill(message, skill_id))
            .await
    }

    /// Submit a task creation request
    pub async fn submit(&mut self, request: CreateTaskRequest) -> Result<Task, A2AError> {
        let operation = A2AOperation::CreateTask {
            request,
            stream: false,
        };
        self.execute_for_task(operation, "create_task").await
    }

    /// Submit a task and stream its progress events
    pub async fn create_task_streaming(
        &mut self,
        request: CreateTaskRequest,
    ) -> Result<TaskEventStream, A2AError> {
        let operation = A2AOperation::CreateTask {
            request,
            stream: true,
        };

        self.execute(operation).await?.into_stream().ok_or_else(|| {
            A2AError::Protocol("Expected event stream from create_task_streaming".into())
        })
    }

    /// Get a task by ID
    ///
    /// # Errors
    ///
    /// Returns `A2AError::TaskNotFound` if the task doesn't exist
    pub async fn get_task(&mut self, task_id: impl Into<String>) -> Result<Task, A2AError> {
        let operation = A2AOperation::GetTask {
            task_id: task_id.into(),
        };
        self.execute_for_task(operation, "get_task").await
    }

    /// Send a follow-up message for an existing task
    pub async fn send_follow_up(
        &mut self,
        task_id: impl Into<String>,
        message: Message,
    ) -> Result<Task, A2AError> {
        let operation = A2AOperation::SendFollowUp {
            task_id: task_id.into(),
            message,
        };
        self.execute_for_task(operation, "send_follow_up").await
    }

    /// List tasks with optional filtering
    ///
    /// # Arguments
    ///
    /// * `status` - Optional filter by task status
    /// * `limit` - Maximum number of tasks to return (server default: 100)
    pub async fn list_tasks(
        &mut self,
        status: Option<TaskStatus>,
        limit: Option<u32>,
    ) -> Result<Vec<Task>, A2AError> {
        self.execute(A2AOperation::ListTasks { status, limit })
            .await?
            .into_task_list()
            .ok_or_else(|| {
                A2AError::Protocol("Expected task list response from list_tasks".into())
            })
    }

    /// List tasks with a specific status
    pub async fn list_tasks_by_status(
        &mut self,
        status: TaskStatus,
    ) -> Result<Vec<Task>, A2AError> {
        self.list_tasks(Some(status), None).await
    }

    /// Poll a task until it stops moving
    ///
    /// Returns when the task is completed, failed, or waiting for input.
    ///
    /// # Arguments
    ///
    /// * `task_id` - The task ID to poll
    /// * `poll_interval` - How long to wait between polls
    /// * `max_attempts` - Maximum number of polling attempts (0 = unlimited)
    pub async fn poll_until_complete(
        &mut self,
        task_id: impl Into<String>,
        poll_interval: Duration,
        max_attempts: usize,
    ) -> Result<Task, A2AError> {
        let task_id = task_id.into();
        let mut attempts = 0;

        loop {
            let task = self.get_task(task_id.clone()).await?;

            if task.is_terminal() || task.requires_input() {
                return Ok(task);
            }

            attempts += 1;
            if max_attempts > 0 && attempts >= max_attempts {
                return Err(A2AError::Timeout);
            }

            tokio::time::sleep(poll_interval).await;
        }
    }
}

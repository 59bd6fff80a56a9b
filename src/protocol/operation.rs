//! A2A protocol operations

use super::{
    message::Message,
    task::{CreateTaskRequest, TaskStatus},
};

/// A2A protocol operations
///
/// This enum represents every operation the agent serves. Each operation is
/// binding-independent: the server builds them from HTTP requests and the
/// client turns them back into HTTP requests.
#[derive(Debug, Clone)]
pub enum A2AOperation {
    /// Fetch the Agent Card
    DiscoverAgent,

    /// Submit a message as a new task
    CreateTask {
        /// Message plus optional skill routing
        request: CreateTaskRequest,

        /// Stream progress events instead of returning the final snapshot
        stream: bool,
    },

    /// Get a task by ID
    GetTask {
        /// The task ID to retrieve
        task_id: String,
    },

    /// Send an additional message for an existing task
    SendFollowUp {
        /// The task the message belongs to
        task_id: String,

        /// The follow-up message
        message: Message,
    },

    /// List tasks with optional filtering
    ListTasks {
        /// Filter by task status
        status: Option<TaskStatus>,

        /// Maximum number of tasks to return
        limit: Option<u32>,
    },
}

impl A2AOperation {
    /// Get the HTTP endpoint path for this operation
    pub fn endpoint(&self) -> String {
        match self {
            A2AOperation::DiscoverAgent => "/.well-known/agent.json".to_string(),
            A2AOperation::CreateTask { stream: false, .. } => "/tasks".to_string(),
            A2AOperation::CreateTask { stream: true, .. } => "/tasks/stream".to_string(),
            A2AOperation::GetTask { task_id } => format!("/tasks/{}", task_id),
            A2AOperation::SendFollowUp { task_id, .. } => format!("/tasks/{}/send", task_id),
            A2AOperation::ListTasks { status, limit } => {
                let mut query = Vec::new();
                if let Some(status) = status {
                    query.push(format!("status={}", status));
                }
                if let Some(limit) = limit {
                    query.push(format!("limit={}", limit));
                }
                if query.is_empty() {
                    "/tasks".to_string()
                } else {
                    format!("/tasks?{}", query.join("&"))
                }
            }
        }
    }

    /// Get the HTTP method for this operation
    pub fn method(&self) -> &'static str {
        match self {
            A2AOperation::DiscoverAgent => "GET",
            A2AOperation::CreateTask { .. } => "POST",
            A2AOperation::GetTask { .. } => "GET",
            A2AOperation::SendFollowUp { .. } => "POST",
            A2AOperation::ListTasks { .. } => "GET",
        }
    }

    /// Check if this operation expects a streaming response
    pub fn is_streaming(&self) -> bool {
        matches!(self, A2AOperation::CreateTask { stream: true, .. })
    }

    /// Whether the operation may be served without credentials
    pub fn is_public(&self) -> bool {
        matches!(self, A2AOperation::DiscoverAgent)
    }

    /// Short operation name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            A2AOperation::DiscoverAgent => "discover_agent",
            A2AOperation::CreateTask { stream: false, .. } => "create_task",
            A2AOperation::CreateTask { stream: true, .. } => "create_task_streaming",
            A2AOperation::GetTask { .. } => "get_task",
            A2AOperation::SendFollowUp { .. } => "send_follow_up",
            A2AOperation::ListTasks { .. } => "list_tasks",
        }
    }
}

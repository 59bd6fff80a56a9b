//! A2A task types and lifecycle management

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{
    error::{A2AError, TaskError},
    message::Message,
    Artifact,
};

/// A task in the A2A protocol
///
/// Tasks are created from a submitted message and move through a small state
/// machine until the skill handler has produced an outcome:
///
/// ```text
/// created → processing → completed (terminal)
///                      → failed (terminal)
///                      → input-required
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Unique identifier for the task
    pub id: String,

    /// Current status of the task
    pub status: TaskStatus,

    /// Input message that created this task
    pub message: Message,

    /// Outputs produced by the task, appended on completion
    #[serde(default)]
    pub artifacts: Vec<Artifact>,

    /// Error information (present if task failed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<TaskError>,

    /// Why the task is waiting on a human (present in input-required)
    #[serde(
        rename = "statusMessage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub status_message: Option<String>,

    /// Skill the task was dispatched to, when one was requested
    #[serde(rename = "skillId", default, skip_serializing_if = "Option::is_none")]
    pub skill_id: Option<String>,

    /// When the task was created
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a new task in the `created` state
    pub fn new(id: impl Into<String>, message: Message) -> Self {
        Self {
            id: id.into(),
            status: TaskStatus::Created,
            message,
            artifacts: Vec::new(),
            error: None,
            status_message: None,
            skill_id: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Set the skill the task is dispatched to
    pub fn with_skill_id(mut self, skill_id: impl Into<String>) -> Self {
        self.skill_id = Some(skill_id.into());
        self
    }

    /// Check if the task is in a terminal state
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Check if the task is still processing
    pub fn is_processing(&self) -> bool {
        matches!(self.status, TaskStatus::Created | TaskStatus::Processing)
    }

    /// Check if the task requires input
    pub fn requires_input(&self) -> bool {
        self.status == TaskStatus::InputRequired
    }

    /// Move the task to `next`, rejecting edges the state machine does not have
    pub fn transition(&mut self, next: TaskStatus) -> Result<(), A2AError> {
        if !self.status.can_transition_to(next) {
            return Err(A2AError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = Some(Utc::now());
        Ok(())
    }

    /// Complete the task, attaching the handler result as a data artifact
    pub fn complete(&mut self, result: Map<String, Value>) -> Result<&Artifact, A2AError> {
        self.transition(TaskStatus::Completed)?;
        self.artifacts.push(Artifact::data("result", result));
        Ok(&self.artifacts[self.artifacts.len() - 1])
    }

    /// Fail the task with a structured error
    pub fn fail(&mut self, error: TaskError) -> Result<(), A2AError> {
        self.transition(TaskStatus::Failed)?;
        self.error = Some(error);
        Ok(())
    }

    /// Park the task until a human provides input
    pub fn require_input(&mut self, reason: impl Into<String>) -> Result<(), A2AError> {
        self.transition(TaskStatus::InputRequired)?;
        self.status_message = Some(reason.into());
        Ok(())
    }
}

/// Task status in the A2A protocol lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Task has been received and stored
    Created,

    /// The skill handler is running
    Processing,

    /// Task requires additional input from a human
    InputRequired,

    /// Task completed successfully
    Completed,

    /// Task failed with an error
    Failed,
}

impl TaskStatus {
    /// Check if this is a terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }

    /// Check if this status requires client action
    pub fn requires_action(&self) -> bool {
        matches!(self, TaskStatus::InputRequired)
    }

    /// Whether the lifecycle has an edge from `self` to `next`
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        matches!(
            (self, next),
            (TaskStatus::Created, TaskStatus::Processing)
                | (TaskStatus::Processing, TaskStatus::Completed)
                | (TaskStatus::Processing, TaskStatus::Failed)
                | (TaskStatus::Processing, TaskStatus::InputRequired)
        )
    }

    /// Wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Created => "created",
            TaskStatus::Processing => "processing",
            TaskStatus::InputRequired => "input-required",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = A2AError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            TaskStatus::Created,
            TaskStatus::Processing,
            TaskStatus::InputRequired,
            TaskStatus::Completed,
            TaskStatus::Failed,
        ]
        .into_iter()
        .find(|status| status.as_str() == s)
        .ok_or_else(|| A2AError::Validation(format!("Unknown task status: {}", s)))
    }
}

/// Request to create a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    /// The message to process
    pub message: Message,

    /// Skill to dispatch to; the default handler runs when absent
    #[serde(rename = "skillId", default, skip_serializing_if = "Option::is_none")]
    pub skill_id: Option<String>,
}

impl CreateTaskRequest {
    /// Request processing by the default handler
    pub fn new(message: Message) -> Self {
        Self {
            message,
            skill_id: None,
        }
    }

    /// Request processing by a specific skill
    pub fn for_skill(message: Message, skill_id: impl Into<String>) -> Self {
        Self {
            message,
            skill_id: Some(skill_id.into()),
        }
    }
}

/// Response from listing tasks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskListResponse {
    /// List of tasks
    pub tasks: Vec<Task>,

    /// Number of tasks returned
    pub total: usize,
}

//! Task progress events for streamed execution

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{task::TaskStatus, Artifact};

/// One progress notification about a task
///
/// A streamed task emits a status update per lifecycle transition and an
/// artifact update when a result is attached. The last event of a stream is
/// a status update with `final` set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TaskEvent {
    /// The task moved to a new status
    StatusUpdate {
        #[serde(rename = "taskId")]
        task_id: String,
        status: TaskStatus,
        timestamp: DateTime<Utc>,
        #[serde(rename = "final", default)]
        final_event: bool,
    },

    /// The task produced an artifact
    ArtifactUpdate {
        #[serde(rename = "taskId")]
        task_id: String,
        artifact: Artifact,
    },
}

impl TaskEvent {
    /// Status update for `task_id`; marked final when the status ends the run
    pub fn status(task_id: impl Into<String>, status: TaskStatus) -> Self {
        TaskEvent::StatusUpdate {
            task_id: task_id.into(),
            status,
            timestamp: Utc::now(),
            final_event: status.is_terminal() || status.requires_action(),
        }
    }

    /// Artifact update for `task_id`
    pub fn artifact(task_id: impl Into<String>, artifact: Artifact) -> Self {
        TaskEvent::ArtifactUpdate {
            task_id: task_id.into(),
            artifact,
        }
    }

    /// Task the event belongs to
    pub fn task_id(&self) -> &str {
        match self {
            TaskEvent::StatusUpdate { task_id, .. } | TaskEvent::ArtifactUpdate { task_id, .. } => {
                task_id
            }
        }
    }

    /// SSE event name
    pub fn kind(&self) -> &'static str {
        match self {
            TaskEvent::StatusUpdate { .. } => "status-update",
            TaskEvent::ArtifactUpdate { .. } => "artifact-update",
        }
    }

    /// Whether this is the last event of a stream
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            TaskEvent::StatusUpdate {
                final_event: true,
                ..
            }
        )
    }
}

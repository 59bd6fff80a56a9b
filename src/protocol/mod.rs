//! Core A2A protocol types and definitions

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

pub mod agent;
pub mod error;
pub mod event;
pub mod message;
pub mod operation;
pub mod task;

pub use agent::{AgentCapabilities, AgentCard, AgentSkill, SecurityScheme};
pub use error::{A2AError, A2AResult, TaskError};
pub use event::TaskEvent;
pub use message::{FilePart, Message, Part, Role};
pub use operation::A2AOperation;
pub use task::{CreateTaskRequest, Task, TaskListResponse, TaskStatus};

/// Artifacts represent task outputs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artifact {
    /// Unique identifier of the Artifact
    #[serde(rename = "artifactId")]
    pub artifact_id: String,

    /// A human readable name for the Artifact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Typed payload of the Artifact
    #[serde(flatten)]
    pub content: ArtifactContent,
}

impl Artifact {
    /// Create a structured data artifact
    pub fn data(name: impl Into<String>, data: Map<String, Value>) -> Self {
        Self::new(name, ArtifactContent::Data { data })
    }

    /// Create a text artifact
    pub fn text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name, ArtifactContent::Text { text: text.into() })
    }

    fn new(name: impl Into<String>, content: ArtifactContent) -> Self {
        Self {
            artifact_id: Uuid::now_v7().to_string(),
            name: Some(name.into()),
            content,
        }
    }

    /// Structured data payload, if this is a data artifact
    pub fn as_data(&self) -> Option<&Map<String, Value>> {
        match &self.content {
            ArtifactContent::Data { data } => Some(data),
            _ => None,
        }
    }
}

/// Payload of an artifact, discriminated by `type` on the wire
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ArtifactContent {
    /// Structured key-value result
    Data { data: Map<String, Value> },

    /// Plain text result
    Text { text: String },

    /// Reference to a file produced elsewhere
    File {
        uri: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
}

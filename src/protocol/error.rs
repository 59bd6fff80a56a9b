//! Error types for A2A protocol operations

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::task::TaskStatus;

/// Main error type for A2A protocol operations
#[derive(Debug, Error)]
pub enum A2AError {
    /// Transport-level error (network, connection, etc.)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Protocol-level error (unexpected response shape, unsupported operation, etc.)
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Validation error (malformed or incomplete request)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Authentication or authorization error
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Task-specific error
    #[error("Task error: {source}")]
    Task {
        #[from]
        source: TaskError,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Request timeout error
    #[error("Request timeout")]
    Timeout,

    /// Task not found error
    #[error("Task not found: {task_id}")]
    TaskNotFound { task_id: String },

    /// No route for the requested path or method
    #[error("Not found: {0}")]
    NotFound(String),

    /// A task lifecycle transition that the state machine does not allow
    #[error("Invalid task transition from {from} to {to}")]
    InvalidTransition { from: TaskStatus, to: TaskStatus },

    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with custom message
    #[error("{0}")]
    Other(String),
}

impl A2AError {
    /// HTTP status code used when this error crosses the server boundary
    pub fn status_code(&self) -> u16 {
        match self {
            A2AError::Validation(_) | A2AError::Serialization(_) => 400,
            A2AError::Auth(_) => 401,
            A2AError::TaskNotFound { .. } | A2AError::NotFound(_) => 404,
            A2AError::Timeout => 504,
            _ => 500,
        }
    }

    /// Task id carried by the error, if any
    pub fn task_id(&self) -> Option<&str> {
        match self {
            A2AError::TaskNotFound { task_id } => Some(task_id),
            _ => None,
        }
    }
}

/// Task-specific error with structured information
///
/// This is what a failed task records; it is never surfaced as a transport fault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct TaskError {
    /// Error code (e.g., "NO_TEXT_CONTENT", "HANDLER_FAILED")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Additional error details as structured data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl TaskError {
    /// Input carried no text part with content
    pub const NO_TEXT_CONTENT: &'static str = "NO_TEXT_CONTENT";

    /// The skill handler returned an error
    pub const HANDLER_FAILED: &'static str = "HANDLER_FAILED";

    /// The skill handler ran past the configured timeout
    pub const HANDLER_TIMEOUT: &'static str = "HANDLER_TIMEOUT";

    /// A lifecycle step could not be written to the task store
    pub const STORE_FAILED: &'static str = "STORE_FAILED";

    /// Create a new task error
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// The error recorded when a message has no extractable text
    pub fn no_text_content() -> Self {
        Self::new(Self::NO_TEXT_CONTENT, "no text content provided")
    }

    /// Add details to the task error
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Result type alias for A2A operations
pub type A2AResult<T> = Result<T, A2AError>;

impl From<reqwest::Error> for A2AError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            A2AError::Timeout
        } else if err.is_connect() {
            A2AError::Transport(format!("Connection error: {}", err))
        } else {
            A2AError::Transport(err.to_string())
        }
    }
}

impl From<&str> for A2AError {
    fn from(s: &str) -> Self {
        A2AError::Other(s.to_string())
    }
}

impl From<String> for A2AError {
    fn from(s: String) -> Self {
        A2AError::Other(s)
    }
}

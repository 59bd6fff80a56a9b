//! Task storage backends
//!
//! The task service never owns a map of tasks directly; it talks to a
//! [`TaskStore`]. Swapping the store changes retention and durability without
//! touching lifecycle logic.

use async_trait::async_trait;

use crate::protocol::{
    error::A2AError,
    task::{Task, TaskStatus},
};

pub mod memory;

pub use memory::InMemoryTaskStore;

/// Storage for task records keyed by task id
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskStore: Send + Sync + 'static {
    /// Insert a task or replace the stored record with the same id
    async fn insert(&self, task: Task) -> Result<(), A2AError>;

    /// Fetch a task snapshot
    async fn get(&self, task_id: &str) -> Result<Option<Task>, A2AError>;

    /// Most recently created tasks first, optionally filtered by status
    async fn list(&self, status: Option<TaskStatus>, limit: usize)
        -> Result<Vec<Task>, A2AError>;
}

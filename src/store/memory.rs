//! Process-local task store

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::TaskStore;
use crate::protocol::{
    error::A2AError,
    task::{Task, TaskStatus},
};

#[derive(Debug, Default)]
struct Inner {
    tasks: HashMap<String, Task>,
    // creation order, oldest first
    order: VecDeque<String>,
}

/// In-memory task store with an optional retention bound
///
/// Without a bound, tasks live as long as the process. With `max_tasks` set,
/// inserting a new task beyond the bound evicts the oldest one.
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    inner: RwLock<Inner>,
    max_tasks: Option<usize>,
}

impl InMemoryTaskStore {
    /// Create an unbounded store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store keeping at most `max_tasks` tasks
    pub fn with_max_tasks(max_tasks: usize) -> Self {
        Self {
            inner: RwLock::default(),
            max_tasks: Some(max_tasks.max(1)),
        }
    }

    /// Number of stored tasks
    pub async fn len(&self) -> usize {
        self.inner.read().await.tasks.len()
    }

    /// Whether the store holds no tasks
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn insert(&self, task: Task) -> Result<(), A2AError> {
        let mut inner = self.inner.write().await;

        if inner.tasks.contains_key(&task.id) {
            inner.tasks.insert(task.id.clone(), task);
            return Ok(());
        }

        inner.order.push_back(task.id.clone());
        inner.tasks.insert(task.id.clone(), task);

        if let Some(max) = self.max_tasks {
            while inner.order.len() > max {
                if let Some(evicted) = inner.order.pop_front() {
                    inner.tasks.remove(&evicted);
                    tracing::debug!(task_id = %evicted, "evicted task past retention bound");
                }
            }
        }

        Ok(())
    }

    async fn get(&self, task_id: &str) -> Result<Option<Task>, A2AError> {
        Ok(self.inner.read().await.tasks.get(task_id).cloned())
    }

    async fn list(
        &self,
        status: Option<TaskStatus>,
        limit: usize,
    ) -> Result<Vec<Task>, A2AError> {
        let inner = self.inner.read().await;

        Ok(inner
            .order
            .iter()
            .rev()
            .filter_map(|id| inner.tasks.get(id))
            .filter(|task| status.map_or(true, |s| task.status == s))
            .take(limit)
            .cloned()
            .collect())
    }
}

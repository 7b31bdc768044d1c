//! In-memory TaskStore implementation.
//!
//! The reference store: a `RwLock`-guarded map. The claim compare-and-set
//! happens under the write lock, which is the atomic conditional-update
//! primitive the lifecycle engine requires. Suitable for tests and
//! single-process deployments; a database-backed store implements the
//! same trait for anything durable.

use async_trait::async_trait;
use chrono::Utc;
use revu_core::{AnalysisReport, Result, RevuError, Task, TaskError, TaskStore};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// `RwLock<HashMap>`-backed task store.
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: RwLock<HashMap<String, Task>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records (test helper).
    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn insert(&self, task: &Task) -> Result<()> {
        let mut tasks = self.tasks.write().await;
        if tasks.contains_key(&task.id) {
            return Err(RevuError::data_access(format!(
                "task '{}' already exists",
                task.id
            )));
        }
        tasks.insert(task.id.clone(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, task_id: &str) -> Result<Option<Task>> {
        Ok(self.tasks.read().await.get(task_id).cloned())
    }

    async fn try_claim(&self, task_id: &str) -> Result<bool> {
        let mut tasks = self.tasks.write().await;
        match tasks.get_mut(task_id) {
            Some(task) => Ok(task.mark_running(Utc::now())),
            // Missing record: lost race semantics, not an error.
            None => Ok(false),
        }
    }

    async fn complete(&self, task_id: &str, report: AnalysisReport) -> Result<()> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(task_id)
            .ok_or_else(|| RevuError::data_access(format!("task '{}' missing", task_id)))?;
        if !task.mark_completed(report, Utc::now()) {
            return Err(RevuError::data_access(format!(
                "task '{}' cannot complete from status '{}'",
                task_id, task.status
            )));
        }
        Ok(())
    }

    async fn fail(&self, task_id: &str, error: TaskError) -> Result<()> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(task_id)
            .ok_or_else(|| RevuError::data_access(format!("task '{}' missing", task_id)))?;
        if !task.mark_failed(error, Utc::now()) {
            return Err(RevuError::data_access(format!(
                "task '{}' is already terminal ('{}')",
                task_id, task.status
            )));
        }
        Ok(())
    }
}

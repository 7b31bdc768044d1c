//! Worker pool.
//!
//! Workers pull work items from the shared dispatch queue and hand them
//! to the orchestrator. They share no in-memory state with each other —
//! the store's atomic claim decides who executes what — and a worker
//! never lets an execution error escape its loop: it logs and moves on.

use revu_application::TaskOrchestrator;
use revu_core::DispatchQueue;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// A set of worker tasks draining the dispatch queue.
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns `count` workers on the current runtime.
    ///
    /// Each worker loops until [`DispatchQueue::recv`] returns `None`
    /// (queue closed and drained).
    pub fn spawn(
        count: usize,
        queue: Arc<dyn DispatchQueue>,
        orchestrator: Arc<TaskOrchestrator>,
    ) -> Self {
        let handles = (0..count)
            .map(|worker_id| {
                let queue = Arc::clone(&queue);
                let orchestrator = Arc::clone(&orchestrator);
                tokio::spawn(async move {
                    tracing::debug!(worker_id, "worker started");
                    while let Some(item) = queue.recv().await {
                        if let Err(e) = orchestrator.execute(&item.task_id, &item.input).await {
                            // A liveness problem, not a validated error path:
                            // the task record carries its own failure state.
                            tracing::error!(
                                worker_id,
                                task_id = %item.task_id,
                                error = %e,
                                "execution error"
                            );
                        }
                    }
                    tracing::debug!(worker_id, "worker stopped");
                })
            })
            .collect();
        Self { handles }
    }

    /// Waits for all workers to drain and exit. Call after closing the
    /// queue.
    pub async fn join(self) {
        for handle in self.handles {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "worker task panicked");
            }
        }
    }
}

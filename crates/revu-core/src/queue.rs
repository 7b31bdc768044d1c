//! Dispatch queue trait.
//!
//! The work-queue abstraction carrying task work items from submission
//! to execution, decoupling request latency from analysis latency.

use crate::error::Result;
use crate::task::AnalysisRequest;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One unit of work: which task to execute and its input.
///
/// The input travels with the item so a worker needs no store read to
/// start; the claim against the store is still what makes execution
/// exactly-once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub task_id: String,
    pub input: AnalysisRequest,
}

impl WorkItem {
    pub fn new(task_id: impl Into<String>, input: AnalysisRequest) -> Self {
        Self {
            task_id: task_id.into(),
            input,
        }
    }
}

/// An abstract work-dispatch channel with at-least-once delivery.
///
/// Any transport qualifies (message broker, database queue, in-process
/// channel) as long as an enqueued item is eventually delivered to some
/// worker. Duplicate delivery is tolerated because workers claim through
/// [`crate::task::TaskStore::try_claim`] before doing any work.
///
/// Redelivery of items whose worker died mid-execution is an external
/// sweep's job (keyed off `Task::started_at`), not this trait's.
#[async_trait]
pub trait DispatchQueue: Send + Sync {
    /// Enqueues one work item.
    ///
    /// # Errors
    ///
    /// Fails with `Queue` if the channel is closed or the transport
    /// rejects the item.
    async fn enqueue(&self, item: WorkItem) -> Result<()>;

    /// Waits for the next work item.
    ///
    /// Returns `None` once the queue is closed and drained; workers use
    /// that as their shutdown signal.
    async fn recv(&self) -> Option<WorkItem>;

    /// Closes the queue for new items. Already-enqueued items are still
    /// delivered.
    fn close(&self);
}

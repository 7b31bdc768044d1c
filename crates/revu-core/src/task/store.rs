//! Task store trait.
//!
//! Defines the interface for durable task-record persistence. The store
//! is the sole source of truth for status and result queries; workers
//! never share in-memory state and coordinate only through it.

use super::model::Task;
use crate::error::{Result, TaskError};
use crate::report::AnalysisReport;
use async_trait::async_trait;

/// An abstract durable keyed store for task records.
///
/// Decouples the lifecycle engine from the storage technology; anything
/// offering an atomic conditional update can implement it (relational
/// row, key-value entry, in-memory map).
///
/// # Write discipline
///
/// The orchestrator holds the only write capability. Per task the writes
/// are: one `insert`, at most one winning `try_claim`, and exactly one
/// terminal write (`complete` or `fail`) issued by the claiming worker.
/// Implementations must refuse to overwrite a terminal state.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Persists a freshly created `Pending` record.
    ///
    /// # Errors
    ///
    /// Fails with `DataAccess` if a record with the same id already
    /// exists or the write fails.
    async fn insert(&self, task: &Task) -> Result<()>;

    /// Finds a task by its id.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Task))`: record found
    /// - `Ok(None)`: no record for this id
    /// - `Err(_)`: storage failure
    async fn find_by_id(&self, task_id: &str) -> Result<Option<Task>>;

    /// Atomically claims the task: compare-and-set `Pending -> Running`,
    /// stamping `started_at`.
    ///
    /// Exactly one of any number of racing claimers observes `true`.
    /// `Ok(false)` means the task was already claimed, already terminal,
    /// or missing — a no-op for the caller, not an error. `started_at`
    /// is what an external stuck-task sweep uses to find `Running`
    /// records with no progress.
    async fn try_claim(&self, task_id: &str) -> Result<bool>;

    /// Terminal write: `Running -> Completed` with the aggregated report.
    ///
    /// # Errors
    ///
    /// Fails with `DataAccess` if the record is missing, was never
    /// claimed, or is already terminal.
    async fn complete(&self, task_id: &str, report: AnalysisReport) -> Result<()>;

    /// Terminal write: mark the task `Failed` with a structured error.
    ///
    /// Allowed from `Pending` or `Running`.
    ///
    /// # Errors
    ///
    /// Fails with `DataAccess` if the record is missing or already
    /// terminal.
    async fn fail(&self, task_id: &str, error: TaskError) -> Result<()>;
}

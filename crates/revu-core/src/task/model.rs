//! Task lifecycle model.
//!
//! A [`Task`] is one asynchronous pull-request-analysis request and its
//! durable lifecycle record. Status moves one way only:
//! `Pending -> Running -> Completed | Failed`. Terminal states never
//! transition again, and `result`/`error` are mutually exclusive — the
//! transition methods here are the only way state changes, so those
//! invariants hold by construction.

use crate::error::TaskError;
use crate::report::AnalysisReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Represents the current status of a task in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// The task has been created and enqueued but not yet claimed.
    Pending,
    /// A worker has claimed the task and is executing it.
    Running,
    /// Aggregation succeeded; the report is available.
    Completed,
    /// The task failed; a structured error is stored on the record.
    Failed,
}

impl TaskStatus {
    /// Returns true for `Completed` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Running => write!(f, "running"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Failed => write!(f, "failed"),
        }
    }
}

/// The submission input: which pull request to analyze.
///
/// Opaque to the lifecycle engine beyond superficial validation; the
/// fetch collaborator interprets it. The access token is redacted from
/// `Debug` output so it cannot leak through logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub repo_url: String,
    pub pr_number: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl AnalysisRequest {
    pub fn new(repo_url: impl Into<String>, pr_number: u64) -> Self {
        Self {
            repo_url: repo_url.into(),
            pr_number,
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

impl fmt::Debug for AnalysisRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisRequest")
            .field("repo_url", &self.repo_url)
            .field("pr_number", &self.pr_number)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// One task record: identity, lifecycle state, input, and (once terminal)
/// either the aggregated result or the stored error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Globally unique identifier (UUID v4, string-encoded).
    pub id: String,
    pub status: TaskStatus,
    pub submitted_at: DateTime<Utc>,
    /// Set exactly once, when a worker wins the claim. Doubles as the
    /// liveness timestamp an external stuck-task sweep keys off.
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub input: AnalysisRequest,
    pub result: Option<AnalysisReport>,
    pub error: Option<TaskError>,
}

impl Task {
    /// Creates a fresh `Pending` record for the given input.
    pub fn new(input: AnalysisRequest) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            status: TaskStatus::Pending,
            submitted_at: Utc::now(),
            started_at: None,
            completed_at: None,
            input,
            result: None,
            error: None,
        }
    }

    /// Attempts the `Pending -> Running` transition.
    ///
    /// Returns false (and changes nothing) unless the task is currently
    /// `Pending`. Stores call this under their atomic-update primitive to
    /// implement the exactly-once claim.
    pub fn mark_running(&mut self, at: DateTime<Utc>) -> bool {
        if self.status != TaskStatus::Pending {
            return false;
        }
        self.status = TaskStatus::Running;
        self.started_at = Some(at);
        true
    }

    /// Attempts the `Running -> Completed` transition, attaching the report.
    ///
    /// Returns false (and changes nothing) if the task is already terminal
    /// or was never claimed.
    pub fn mark_completed(&mut self, report: AnalysisReport, at: DateTime<Utc>) -> bool {
        if self.status != TaskStatus::Running {
            return false;
        }
        self.status = TaskStatus::Completed;
        self.completed_at = Some(at);
        self.result = Some(report);
        self.error = None;
        true
    }

    /// Attempts the transition to `Failed`, attaching the structured error.
    ///
    /// Allowed from `Pending` or `Running` (a task may fail before any
    /// worker claims it, e.g. when the enqueue is rolled back). Returns
    /// false if already terminal.
    pub fn mark_failed(&mut self, error: TaskError, at: DateTime<Utc>) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = TaskStatus::Failed;
        self.completed_at = Some(at);
        self.error = Some(error);
        self.result = None;
        true
    }

    /// True once a completed result can be read back.
    pub fn result_available(&self) -> bool {
        self.status == TaskStatus::Completed && self.result.is_some()
    }
}

//! Error types for the revu analysis engine.

use crate::task::TaskStatus;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, RevuError>;

/// Classifies upstream source-control access failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    /// Transport-level failure (DNS, connect, timeout, 5xx).
    Network,
    /// The host rejected our credentials (401/403).
    Auth,
    /// The repository, pull request, or file does not exist (404).
    NotFound,
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchErrorKind::Network => write!(f, "network"),
            FetchErrorKind::Auth => write!(f, "auth"),
            FetchErrorKind::NotFound => write!(f, "not_found"),
        }
    }
}

/// Classifies the terminal error stored on a failed task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskErrorKind {
    /// Fetching the pull request from the source-control host failed.
    Fetch(FetchErrorKind),
    /// An unrecoverable error outside the per-file loop.
    Internal,
}

impl fmt::Display for TaskErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskErrorKind::Fetch(kind) => write!(f, "fetch/{}", kind),
            TaskErrorKind::Internal => write!(f, "internal"),
        }
    }
}

/// The structured error persisted on a task record when its status
/// becomes `Failed`.
///
/// This is data, not a control-flow error: it survives in the store and
/// is handed back to callers wrapped in [`RevuError::TaskFailed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskError {
    pub kind: TaskErrorKind,
    pub message: String,
}

impl TaskError {
    /// Creates a fetch-failure task error.
    pub fn fetch(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind: TaskErrorKind::Fetch(kind),
            message: message.into(),
        }
    }

    /// Creates an internal task error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: TaskErrorKind::Internal,
            message: message.into(),
        }
    }
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// A shared error type for the entire revu workspace.
///
/// Provides typed, structured variants so the read path can distinguish
/// "not found", "not ready yet", and "failed with reason" without string
/// matching. Serializable so the HTTP layer can render errors directly;
/// only [`TaskError`] ever crosses the persistence boundary back in.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum RevuError {
    /// The caller's submission was rejected; nothing was persisted.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// The result was requested before the task reached a terminal state.
    #[error("Result not ready for task '{id}' (status: {status})")]
    NotReady { id: String, status: TaskStatus },

    /// The task terminated with a stored error.
    #[error("Task '{id}' failed: {error}")]
    TaskFailed { id: String, error: TaskError },

    /// Upstream source-control access failure.
    #[error("Fetch error ({kind}): {message}")]
    Fetch {
        kind: FetchErrorKind,
        message: String,
    },

    /// Data access error (store layer)
    #[error("Data access error: {0}")]
    DataAccess(String),

    /// Dispatch queue error
    #[error("Queue error: {0}")]
    Queue(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RevuError {
    // ========================================================================
    // Constructor helpers
    // ========================================================================

    /// Creates an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates a NotFound error.
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a NotReady error.
    pub fn not_ready(id: impl Into<String>, status: TaskStatus) -> Self {
        Self::NotReady {
            id: id.into(),
            status,
        }
    }

    /// Creates a TaskFailed error wrapping the stored terminal error.
    pub fn task_failed(id: impl Into<String>, error: TaskError) -> Self {
        Self::TaskFailed {
            id: id.into(),
            error,
        }
    }

    /// Creates a Fetch error.
    pub fn fetch(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self::Fetch {
            kind,
            message: message.into(),
        }
    }

    /// Creates a DataAccess error.
    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    /// Creates a Queue error.
    pub fn queue(message: impl Into<String>) -> Self {
        Self::Queue(message.into())
    }

    /// Creates a Config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ========================================================================
    // Type checking methods
    // ========================================================================

    /// Returns true if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a NotReady error.
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Self::NotReady { .. })
    }

    /// Returns true if this is a Fetch error.
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }

    /// Converts a terminal control-flow error into the form persisted on a
    /// failed task record.
    pub fn into_task_error(self) -> TaskError {
        match self {
            Self::Fetch { kind, message } => TaskError::fetch(kind, message),
            other => TaskError::internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_becomes_fetch_task_error() {
        let err = RevuError::fetch(FetchErrorKind::Auth, "bad credentials");
        let task_error = err.into_task_error();
        assert_eq!(task_error.kind, TaskErrorKind::Fetch(FetchErrorKind::Auth));
        assert_eq!(task_error.message, "bad credentials");
    }

    #[test]
    fn test_other_errors_become_internal_task_errors() {
        let err = RevuError::data_access("write failed");
        let task_error = err.into_task_error();
        assert_eq!(task_error.kind, TaskErrorKind::Internal);
        assert!(task_error.message.contains("write failed"));
    }

    #[test]
    fn test_display_distinguishes_read_path_outcomes() {
        let not_found = RevuError::not_found("task", "abc");
        let not_ready = RevuError::not_ready("abc", TaskStatus::Running);
        let failed = RevuError::task_failed(
            "abc",
            TaskError::fetch(FetchErrorKind::NotFound, "no such PR"),
        );

        assert!(not_found.to_string().contains("not found"));
        assert!(not_ready.to_string().contains("not ready"));
        assert!(failed.to_string().contains("failed"));
        assert!(failed.to_string().contains("no such PR"));
    }

    #[test]
    fn test_task_error_round_trips_through_json() {
        let original = TaskError::fetch(FetchErrorKind::Network, "connection refused");
        let json = serde_json::to_string(&original).unwrap();
        let restored: TaskError = serde_json::from_str(&json).unwrap();
        assert_eq!(original, restored);
    }
}

//! revu-core: domain layer for the revu analysis engine.
//!
//! Holds the task lifecycle model, the issue/report model, the error
//! taxonomy, and the contracts (store, queue, fetcher, strategy) that the
//! outer layers implement. Nothing here does I/O.

pub mod config;
pub mod error;
pub mod fetch;
pub mod language;
pub mod queue;
pub mod report;
pub mod rules;
pub mod strategy;
pub mod task;

// Re-export the common error type and the most-used domain types.
pub use config::RevuConfig;
pub use error::{FetchErrorKind, Result, RevuError, TaskError, TaskErrorKind};
pub use fetch::{ChangeFetcher, ChangedFile};
pub use language::LanguageMap;
pub use queue::{DispatchQueue, WorkItem};
pub use report::{AnalysisReport, FileAnalysis, Issue, ReportSummary, Severity};
pub use rules::RecommendationRules;
pub use strategy::AnalysisStrategy;
pub use task::{AnalysisRequest, Task, TaskStatus, TaskStore};

//! Analysis strategy trait.
//!
//! The pluggable capability that decides what an "issue" is. The
//! lifecycle engine only invokes it once per changed file and interprets
//! the output; it never depends on how the findings were produced
//! (heuristic scan today, an LLM reviewer tomorrow).

use crate::error::Result;
use crate::fetch::ChangedFile;
use crate::report::Issue;
use async_trait::async_trait;

/// A capability interface with one method, chosen by configuration.
///
/// A failure is isolated to the file it occurred on: the orchestrator
/// records a synthetic `analysis-error` issue for that file and the task
/// carries on, so one bad file cannot fail an entire pull request's
/// analysis.
#[async_trait]
pub trait AnalysisStrategy: Send + Sync {
    /// Analyzes one changed file and returns its findings in order.
    ///
    /// `language` is the detected language for the file, when the
    /// extension is known; strategies may use it to pick rules.
    async fn analyze(&self, file: &ChangedFile, language: Option<&str>) -> Result<Vec<Issue>>;

    /// Configuration name this strategy is selected by.
    fn name(&self) -> &'static str;
}

//! Change fetcher trait.
//!
//! Boundary to the source-control host: given a repository URL and a
//! pull-request number, produce the changed files to analyze. Fetching
//! failures are terminal for a task and are stored on its record.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One file changed by a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedFile {
    /// Repository-relative path.
    pub path: String,
    /// Full file content at the pull request's head revision.
    pub content: String,
    /// The diff hunk for this file, when the host provides one.
    /// Strategies that understand diffs can focus on the changed lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<String>,
}

impl ChangedFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            patch: None,
        }
    }

    pub fn with_patch(mut self, patch: impl Into<String>) -> Self {
        self.patch = Some(patch.into());
        self
    }

    /// The text a strategy should look at: the patch when present,
    /// otherwise the full content.
    pub fn analyzed_content(&self) -> &str {
        self.patch.as_deref().unwrap_or(&self.content)
    }

    /// Line count of [`Self::analyzed_content`], recorded on the
    /// per-file analysis.
    pub fn lines_analyzed(&self) -> u32 {
        self.analyzed_content().lines().count() as u32
    }
}

/// Fetches the files changed by a pull request.
#[async_trait]
pub trait ChangeFetcher: Send + Sync {
    /// Lists the changed files with their content.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::RevuError::Fetch`] carrying a
    /// [`crate::FetchErrorKind`] (`Network`, `Auth`, or `NotFound`).
    async fn fetch_changed_files(
        &self,
        repo_url: &str,
        pr_number: u64,
        token: Option<&str>,
    ) -> Result<Vec<ChangedFile>>;
}

//! Task orchestrator.
//!
//! Owns the task state machine: creates records at submission, performs
//! the exactly-once claim when a worker picks work up, fans analysis out
//! across the changed files, and is the only writer of terminal states.
//! All coordination passes through the [`TaskStore`]; the orchestrator
//! itself keeps no mutable state.

use crate::aggregator::aggregate;
use futures::future::join_all;
use revu_core::{
    AnalysisRequest, AnalysisReport, AnalysisStrategy, ChangeFetcher, ChangedFile, DispatchQueue,
    FileAnalysis, Issue, LanguageMap, RecommendationRules, Result, RevuError, Task, TaskError,
    TaskStatus, TaskStore, WorkItem,
};
use std::sync::Arc;

/// What the read path exposes for a status query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStatusView {
    pub task_id: String,
    pub status: TaskStatus,
    pub result_available: bool,
}

/// Coordinates the task lifecycle around the pluggable collaborators.
///
/// Explicitly constructed with its store, queue, fetcher, and strategy
/// handles; clone the `Arc`s to share it between the submit path and the
/// workers.
pub struct TaskOrchestrator {
    store: Arc<dyn TaskStore>,
    queue: Arc<dyn DispatchQueue>,
    fetcher: Arc<dyn ChangeFetcher>,
    strategy: Arc<dyn AnalysisStrategy>,
    languages: LanguageMap,
    rules: RecommendationRules,
}

impl TaskOrchestrator {
    pub fn new(
        store: Arc<dyn TaskStore>,
        queue: Arc<dyn DispatchQueue>,
        fetcher: Arc<dyn ChangeFetcher>,
        strategy: Arc<dyn AnalysisStrategy>,
        languages: LanguageMap,
        rules: RecommendationRules,
    ) -> Self {
        Self {
            store,
            queue,
            fetcher,
            strategy,
            languages,
            rules,
        }
    }

    /// Superficial submission validation: a well-formed http(s) repository
    /// URL with an owner/repo path, and a positive pull-request number.
    /// Anything deeper is the fetch collaborator's concern.
    fn validate(input: &AnalysisRequest) -> Result<()> {
        if input.pr_number == 0 {
            return Err(RevuError::invalid_input(
                "pull-request number must be positive",
            ));
        }

        let rest = input
            .repo_url
            .strip_prefix("https://")
            .or_else(|| input.repo_url.strip_prefix("http://"))
            .ok_or_else(|| {
                RevuError::invalid_input(format!(
                    "repository URL '{}' must be http(s)",
                    input.repo_url
                ))
            })?;

        let mut segments = rest.split('/').filter(|s| !s.is_empty());
        let host = segments.next();
        let owner = segments.next();
        let repo = segments.next();
        if host.is_none() || owner.is_none() || repo.is_none() {
            return Err(RevuError::invalid_input(format!(
                "repository URL '{}' has no owner/repo path",
                input.repo_url
            )));
        }

        Ok(())
    }

    /// Accepts a new analysis request.
    ///
    /// Creates the `Pending` record, enqueues the work item, and returns
    /// the fresh task id. On validation failure nothing is persisted and
    /// nothing is enqueued. If the enqueue itself fails after the record
    /// was written, the record is failed so it cannot hang `Pending`
    /// forever.
    pub async fn submit(&self, input: AnalysisRequest) -> Result<String> {
        Self::validate(&input)?;

        let task = Task::new(input.clone());
        let task_id = task.id.clone();
        self.store.insert(&task).await?;

        if let Err(e) = self.queue.enqueue(WorkItem::new(task_id.clone(), input)).await {
            tracing::error!(task_id = %task_id, error = %e, "enqueue failed after insert");
            let _ = self
                .store
                .fail(&task_id, TaskError::internal(format!("enqueue failed: {}", e)))
                .await;
            return Err(e);
        }

        tracing::info!(task_id = %task_id, "task submitted");
        Ok(task_id)
    }

    /// Executes one dispatched work item; invoked by a worker.
    ///
    /// Starts with the atomic claim: losing it (already claimed, already
    /// terminal, record missing) is a silent no-op, so duplicate delivery
    /// is harmless. After a won claim every failure is converted into a
    /// terminal `Failed` write — errors are recorded on the task, never
    /// thrown back through the dispatch channel.
    pub async fn execute(&self, task_id: &str, input: &AnalysisRequest) -> Result<()> {
        if !self.store.try_claim(task_id).await? {
            tracing::debug!(task_id = %task_id, "claim lost, skipping");
            return Ok(());
        }
        tracing::info!(task_id = %task_id, pr = input.pr_number, "task claimed");

        let files = match self
            .fetcher
            .fetch_changed_files(&input.repo_url, input.pr_number, input.token.as_deref())
            .await
        {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!(task_id = %task_id, error = %e, "fetch failed");
                return self.record_failure(task_id, e.into_task_error()).await;
            }
        };

        let analyses = self.analyze_all(&files).await;
        let report = aggregate(analyses, &self.languages, &self.rules);

        if let Err(e) = self.store.complete(task_id, report).await {
            tracing::error!(task_id = %task_id, error = %e, "terminal write failed");
            return self.record_failure(task_id, e.into_task_error()).await;
        }

        tracing::info!(task_id = %task_id, "task completed");
        Ok(())
    }

    /// Analyzes all files concurrently, reassembling results in the
    /// original file order. A per-file strategy failure is isolated into
    /// a synthetic `analysis-error` issue for that file.
    async fn analyze_all(&self, files: &[ChangedFile]) -> Vec<FileAnalysis> {
        let analyses = files.iter().map(|file| {
            let language = self.languages.detect(&file.path).map(str::to_string);
            async move {
                let issues = match self.strategy.analyze(file, language.as_deref()).await {
                    Ok(issues) => issues,
                    Err(e) => {
                        tracing::warn!(path = %file.path, error = %e, "strategy failed for file");
                        vec![Issue::analysis_error(e.to_string())]
                    }
                };
                FileAnalysis::new(file.path.clone(), file.lines_analyzed(), issues)
            }
        });
        // join_all preserves input order regardless of completion order.
        join_all(analyses).await
    }

    /// Best-effort terminal failure write. If even this write fails the
    /// task stays `Running` and is left to the external stuck-task sweep
    /// (which keys off `started_at`); the worker must not crash.
    async fn record_failure(&self, task_id: &str, error: TaskError) -> Result<()> {
        if let Err(e) = self.store.fail(task_id, error).await {
            tracing::error!(task_id = %task_id, error = %e, "failed to record task failure");
        }
        Ok(())
    }

    /// Looks up the lifecycle status for a task.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id; never errors for a valid one.
    pub async fn get_status(&self, task_id: &str) -> Result<TaskStatusView> {
        let task = self
            .store
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| RevuError::not_found("task", task_id))?;
        let result_available = task.result_available();
        Ok(TaskStatusView {
            task_id: task.id,
            status: task.status,
            result_available,
        })
    }

    /// Retrieves the aggregated report for a completed task.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown id
    /// - `NotReady` while the task is pending or running
    /// - `TaskFailed` carrying the stored error when the task failed
    pub async fn get_result(&self, task_id: &str) -> Result<AnalysisReport> {
        let task = self
            .store
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| RevuError::not_found("task", task_id))?;

        match task.status {
            TaskStatus::Pending | TaskStatus::Running => {
                Err(RevuError::not_ready(task.id, task.status))
            }
            TaskStatus::Failed => {
                let error = task
                    .error
                    .unwrap_or_else(|| TaskError::internal("failed task has no stored error"));
                Err(RevuError::task_failed(task_id, error))
            }
            TaskStatus::Completed => task
                .result
                .ok_or_else(|| RevuError::internal("completed task has no stored result")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use revu_core::{FetchErrorKind, Severity, TaskErrorKind};
    use revu_infrastructure::{InMemoryTaskStore, MpscDispatchQueue};

    /// Fetcher returning a canned file list, or a canned error.
    struct FakeFetcher {
        outcome: std::result::Result<Vec<ChangedFile>, RevuError>,
    }

    impl FakeFetcher {
        fn files(files: Vec<ChangedFile>) -> Self {
            Self { outcome: Ok(files) }
        }

        fn failing(kind: FetchErrorKind) -> Self {
            Self {
                outcome: Err(RevuError::fetch(kind, "upstream unavailable")),
            }
        }
    }

    #[async_trait]
    impl ChangeFetcher for FakeFetcher {
        async fn fetch_changed_files(
            &self,
            _repo_url: &str,
            _pr_number: u64,
            _token: Option<&str>,
        ) -> Result<Vec<ChangedFile>> {
            self.outcome.clone()
        }
    }

    /// Strategy returning fixed issues per path; errors for marked paths.
    struct ScriptedStrategy {
        issues: Vec<(String, Vec<Issue>)>,
        failing_paths: Vec<String>,
    }

    impl ScriptedStrategy {
        fn new(issues: Vec<(String, Vec<Issue>)>) -> Self {
            Self {
                issues,
                failing_paths: vec![],
            }
        }

        fn failing_on(mut self, path: &str) -> Self {
            self.failing_paths.push(path.to_string());
            self
        }
    }

    #[async_trait]
    impl AnalysisStrategy for ScriptedStrategy {
        async fn analyze(
            &self,
            file: &ChangedFile,
            _language: Option<&str>,
        ) -> Result<Vec<Issue>> {
            if self.failing_paths.contains(&file.path) {
                return Err(RevuError::internal("scripted strategy failure"));
            }
            Ok(self
                .issues
                .iter()
                .find(|(path, _)| path == &file.path)
                .map(|(_, issues)| issues.clone())
                .unwrap_or_default())
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    fn issue(severity: Severity) -> Issue {
        Issue {
            kind: Issue::KIND_BUG.to_string(),
            line: 7,
            description: "finding".to_string(),
            suggestion: "fix it".to_string(),
            severity,
        }
    }

    struct Harness {
        orchestrator: TaskOrchestrator,
        store: Arc<InMemoryTaskStore>,
        queue: Arc<MpscDispatchQueue>,
    }

    fn harness(fetcher: FakeFetcher, strategy: ScriptedStrategy) -> Harness {
        let store = Arc::new(InMemoryTaskStore::new());
        let queue = Arc::new(MpscDispatchQueue::new());
        let orchestrator = TaskOrchestrator::new(
            store.clone(),
            queue.clone(),
            Arc::new(fetcher),
            Arc::new(strategy),
            LanguageMap::default(),
            RecommendationRules::default(),
        );
        Harness {
            orchestrator,
            store,
            queue,
        }
    }

    fn request() -> AnalysisRequest {
        AnalysisRequest::new("https://github.com/a/b", 1)
    }

    #[tokio::test]
    async fn test_status_immediately_after_submit_is_pending() {
        let h = harness(FakeFetcher::files(vec![]), ScriptedStrategy::new(vec![]));
        let task_id = h.orchestrator.submit(request()).await.unwrap();

        let view = h.orchestrator.get_status(&task_id).await.unwrap();
        assert_eq!(view.status, TaskStatus::Pending);
        assert!(!view.result_available);
    }

    #[tokio::test]
    async fn test_submit_enqueues_one_work_item() {
        let h = harness(FakeFetcher::files(vec![]), ScriptedStrategy::new(vec![]));
        let task_id = h.orchestrator.submit(request()).await.unwrap();

        let item = h.queue.recv().await.unwrap();
        assert_eq!(item.task_id, task_id);
        assert_eq!(item.input, request());
    }

    #[tokio::test]
    async fn test_invalid_input_persists_nothing() {
        let h = harness(FakeFetcher::files(vec![]), ScriptedStrategy::new(vec![]));

        let bad_pr = AnalysisRequest::new("https://github.com/a/b", 0);
        let err = h.orchestrator.submit(bad_pr).await.unwrap_err();
        assert!(matches!(err, RevuError::InvalidInput(_)));

        let bad_url = AnalysisRequest::new("ftp://github.com/a/b", 1);
        assert!(h.orchestrator.submit(bad_url).await.is_err());

        let no_path = AnalysisRequest::new("https://github.com", 1);
        assert!(h.orchestrator.submit(no_path).await.is_err());

        assert!(h.store.is_empty().await);
        h.queue.close();
        assert!(h.queue.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found_for_status_and_result() {
        let h = harness(FakeFetcher::files(vec![]), ScriptedStrategy::new(vec![]));

        let err = h.orchestrator.get_status("unknown-id").await.unwrap_err();
        assert!(err.is_not_found());

        let err = h.orchestrator.get_result("unknown-id").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_scenario_one_file_one_high_one_low() {
        // Submit, observe NotReady, execute, read the final report back.
        let file = ChangedFile::new("docs/notes.unknownext", "line1\nline2\nline3");
        let strategy = ScriptedStrategy::new(vec![(
            "docs/notes.unknownext".to_string(),
            vec![issue(Severity::High), issue(Severity::Low)],
        )]);
        let h = harness(FakeFetcher::files(vec![file]), strategy);

        let task_id = h.orchestrator.submit(request()).await.unwrap();
        let err = h.orchestrator.get_result(&task_id).await.unwrap_err();
        assert!(err.is_not_ready());

        let item = h.queue.recv().await.unwrap();
        h.orchestrator
            .execute(&item.task_id, &item.input)
            .await
            .unwrap();

        let view = h.orchestrator.get_status(&task_id).await.unwrap();
        assert_eq!(view.status, TaskStatus::Completed);
        assert!(view.result_available);

        let report = h.orchestrator.get_result(&task_id).await.unwrap();
        let s = &report.summary;
        assert_eq!(s.total_files, 1);
        assert_eq!(s.total_issues, 2);
        assert_eq!(s.high_issues, 1);
        assert_eq!(s.low_issues, 1);
        assert_eq!(s.critical_issues, 0);
        assert_eq!(s.medium_issues, 0);

        let high_messages: Vec<_> = report
            .recommendations
            .iter()
            .filter(|r| r.contains("high-priority"))
            .collect();
        assert_eq!(high_messages.len(), 1);
        assert_eq!(report.files[0].lines_analyzed, 3);
    }

    #[tokio::test]
    async fn test_fetch_failure_marks_task_failed_with_stored_error() {
        let h = harness(
            FakeFetcher::failing(FetchErrorKind::NotFound),
            ScriptedStrategy::new(vec![]),
        );
        let task_id = h.orchestrator.submit(request()).await.unwrap();
        let item = h.queue.recv().await.unwrap();

        h.orchestrator
            .execute(&item.task_id, &item.input)
            .await
            .unwrap();

        let view = h.orchestrator.get_status(&task_id).await.unwrap();
        assert_eq!(view.status, TaskStatus::Failed);
        assert!(!view.result_available);

        let stored = h.store.find_by_id(&task_id).await.unwrap().unwrap();
        assert!(stored.result.is_none());
        assert_eq!(
            stored.error.as_ref().unwrap().kind,
            TaskErrorKind::Fetch(FetchErrorKind::NotFound)
        );

        let err = h.orchestrator.get_result(&task_id).await.unwrap_err();
        match err {
            RevuError::TaskFailed { error, .. } => {
                assert_eq!(error.kind, TaskErrorKind::Fetch(FetchErrorKind::NotFound));
            }
            other => panic!("expected TaskFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_one_failing_file_does_not_fail_the_task() {
        let files = vec![
            ChangedFile::new("ok.unknownext", "fine"),
            ChangedFile::new("broken.unknownext", "boom"),
        ];
        let strategy = ScriptedStrategy::new(vec![(
            "ok.unknownext".to_string(),
            vec![issue(Severity::Medium)],
        )])
        .failing_on("broken.unknownext");
        let h = harness(FakeFetcher::files(files), strategy);

        let task_id = h.orchestrator.submit(request()).await.unwrap();
        let item = h.queue.recv().await.unwrap();
        h.orchestrator
            .execute(&item.task_id, &item.input)
            .await
            .unwrap();

        let report = h.orchestrator.get_result(&task_id).await.unwrap();
        assert_eq!(report.summary.total_files, 2);

        // Order preserved; the broken file carries exactly one synthetic issue.
        assert_eq!(report.files[0].path, "ok.unknownext");
        assert_eq!(report.files[0].issues[0].kind, Issue::KIND_BUG);
        assert_eq!(report.files[1].path, "broken.unknownext");
        assert_eq!(report.files[1].issues.len(), 1);
        assert_eq!(report.files[1].issues[0].kind, Issue::KIND_ANALYSIS_ERROR);
        assert_eq!(report.files[1].issues[0].line, Issue::FILE_LEVEL);
    }

    #[tokio::test]
    async fn test_duplicate_delivery_executes_once() {
        let file = ChangedFile::new("a.unknownext", "x");
        let strategy = ScriptedStrategy::new(vec![(
            "a.unknownext".to_string(),
            vec![issue(Severity::Low)],
        )]);
        let h = harness(FakeFetcher::files(vec![file]), strategy);

        let task_id = h.orchestrator.submit(request()).await.unwrap();
        let item = h.queue.recv().await.unwrap();

        h.orchestrator
            .execute(&item.task_id, &item.input)
            .await
            .unwrap();
        // Second delivery of the same item: claim lost, silent no-op.
        h.orchestrator
            .execute(&item.task_id, &item.input)
            .await
            .unwrap();

        let report = h.orchestrator.get_result(&task_id).await.unwrap();
        assert_eq!(report.summary.total_issues, 1);
    }

    #[tokio::test]
    async fn test_status_progression_is_monotonic() {
        let h = harness(FakeFetcher::files(vec![]), ScriptedStrategy::new(vec![]));
        let task_id = h.orchestrator.submit(request()).await.unwrap();

        let observed_before = h.orchestrator.get_status(&task_id).await.unwrap().status;
        assert_eq!(observed_before, TaskStatus::Pending);

        let item = h.queue.recv().await.unwrap();
        h.orchestrator
            .execute(&item.task_id, &item.input)
            .await
            .unwrap();

        let observed_after = h.orchestrator.get_status(&task_id).await.unwrap().status;
        assert_eq!(observed_after, TaskStatus::Completed);

        // Terminal means terminal: a late execute cannot move it again.
        h.orchestrator
            .execute(&item.task_id, &item.input)
            .await
            .unwrap();
        assert_eq!(
            h.orchestrator.get_status(&task_id).await.unwrap().status,
            TaskStatus::Completed
        );
    }

    #[tokio::test]
    async fn test_empty_pull_request_completes_with_empty_report() {
        let h = harness(FakeFetcher::files(vec![]), ScriptedStrategy::new(vec![]));
        let task_id = h.orchestrator.submit(request()).await.unwrap();
        let item = h.queue.recv().await.unwrap();
        h.orchestrator
            .execute(&item.task_id, &item.input)
            .await
            .unwrap();

        let report = h.orchestrator.get_result(&task_id).await.unwrap();
        assert_eq!(report.summary.total_files, 0);
        assert_eq!(report.summary.total_issues, 0);
        assert!(report.recommendations.is_empty());
    }
}

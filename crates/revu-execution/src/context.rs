//! Runtime wiring.
//!
//! [`RuntimeContext`] is the explicitly constructed, passed-around bundle
//! of store, queue, orchestrator, and workers — initialized once at
//! process start and torn down at shutdown. No module-level singletons.

use revu_analysis::strategy_from_config;
use revu_application::TaskOrchestrator;
use revu_core::{ChangeFetcher, DispatchQueue, Result, RevuConfig, TaskStore};
use revu_infrastructure::{GitHubChangeFetcher, InMemoryTaskStore, MpscDispatchQueue};
use std::sync::Arc;

use crate::worker::WorkerPool;

/// The wired-up engine: every handle a front door needs.
pub struct RuntimeContext {
    store: Arc<dyn TaskStore>,
    queue: Arc<dyn DispatchQueue>,
    orchestrator: Arc<TaskOrchestrator>,
    workers: Option<WorkerPool>,
}

impl RuntimeContext {
    /// Builds the engine from configuration with the reference adapters
    /// (in-memory store, in-process queue, GitHub fetcher) and starts the
    /// configured number of workers.
    pub fn start(config: &RevuConfig) -> Result<Self> {
        let fetcher: Arc<dyn ChangeFetcher> = Arc::new(GitHubChangeFetcher::new());
        Self::start_with(config, fetcher)
    }

    /// Same as [`Self::start`] but with a caller-provided fetch
    /// collaborator (tests, other source-control hosts).
    pub fn start_with(config: &RevuConfig, fetcher: Arc<dyn ChangeFetcher>) -> Result<Self> {
        let store: Arc<dyn TaskStore> = Arc::new(InMemoryTaskStore::new());
        let queue: Arc<dyn DispatchQueue> = Arc::new(MpscDispatchQueue::new());
        let strategy = strategy_from_config(&config.strategy)?;

        let orchestrator = Arc::new(TaskOrchestrator::new(
            Arc::clone(&store),
            Arc::clone(&queue),
            fetcher,
            strategy,
            config.languages.clone(),
            config.rules.clone(),
        ));

        let workers = WorkerPool::spawn(
            config.workers.max(1),
            Arc::clone(&queue),
            Arc::clone(&orchestrator),
        );
        tracing::info!(workers = config.workers.max(1), strategy = %config.strategy, "engine started");

        Ok(Self {
            store,
            queue,
            orchestrator,
            workers: Some(workers),
        })
    }

    /// The submit/status/result surface the HTTP layer calls.
    pub fn orchestrator(&self) -> Arc<TaskOrchestrator> {
        Arc::clone(&self.orchestrator)
    }

    /// Read-only store handle (e.g. for an external stuck-task sweep).
    pub fn store(&self) -> Arc<dyn TaskStore> {
        Arc::clone(&self.store)
    }

    /// Stops accepting work, drains the queue, and joins the workers.
    pub async fn shutdown(mut self) {
        self.queue.close();
        if let Some(workers) = self.workers.take() {
            workers.join().await;
        }
        tracing::info!("engine stopped");
    }
}

//! revu-infrastructure: adapters behind the core contracts.
//!
//! Reference implementations of the store and queue plus the GitHub
//! fetch collaborator. Each is a swappable adapter: the orchestrator
//! only sees the traits in `revu-core`.

mod github_fetcher;
mod memory_task_store;
mod mpsc_queue;

pub use github_fetcher::GitHubChangeFetcher;
pub use memory_task_store::InMemoryTaskStore;
pub use mpsc_queue::MpscDispatchQueue;

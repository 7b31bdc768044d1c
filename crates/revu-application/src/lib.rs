//! revu-application: the lifecycle and aggregation engine.
//!
//! [`TaskOrchestrator`] owns the state machine and is the only writer of
//! terminal states; [`aggregate`] turns per-file findings into the final
//! report. Both work purely against the contracts in `revu-core`.

mod aggregator;
mod orchestrator;

pub use aggregator::aggregate;
pub use orchestrator::{TaskOrchestrator, TaskStatusView};

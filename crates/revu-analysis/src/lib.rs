//! revu-analysis: pluggable analysis strategies.
//!
//! Strategies implement [`revu_core::AnalysisStrategy`] and are selected
//! by name from configuration, not wired through a type hierarchy. Today
//! the built-in [`HeuristicStrategy`] is the only one; an LLM-backed
//! reviewer slots in behind the same trait.

mod heuristic;

pub use heuristic::HeuristicStrategy;

use revu_core::{AnalysisStrategy, Result, RevuError};
use std::sync::Arc;

/// Resolves a strategy by its configuration name.
///
/// # Errors
///
/// Fails with `Config` for unknown names, listing nothing about how the
/// known ones work — callers only see the trait.
pub fn strategy_from_config(name: &str) -> Result<Arc<dyn AnalysisStrategy>> {
    match name {
        HeuristicStrategy::NAME => Ok(Arc::new(HeuristicStrategy::new())),
        other => Err(RevuError::config(format!(
            "unknown analysis strategy '{}'",
            other
        ))),
    }
}

//! Task domain module.
//!
//! Contains the task lifecycle model and the persistence contract for
//! task records.
//!
//! # Module Structure
//!
//! - `model`: the task record, its status machine, and the submission input
//! - `store`: the [`TaskStore`] trait, the sole source of truth for
//!   status and result queries

mod model;
pub mod store;

pub use model::{AnalysisRequest, Task, TaskStatus};
pub use store::TaskStore;

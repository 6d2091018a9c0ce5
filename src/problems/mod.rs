//! Problem log and review history

pub mod models;
pub mod storage;

pub use models::{Difficulty, Platform, Problem, ProblemStats, ReviewEntry, ReviewOutcome};
pub use storage::{ProblemStorage, ProblemStorageError};

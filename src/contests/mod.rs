//! Contest tracking

pub mod models;
pub mod storage;

pub use models::{Contest, ContestResult};
pub use storage::{ContestStorage, ContestStorageError};

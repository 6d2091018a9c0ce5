//! Practice todos

pub mod models;
pub mod storage;

pub use models::{Priority, Todo};
pub use storage::{TodoStorage, TodoStorageError};

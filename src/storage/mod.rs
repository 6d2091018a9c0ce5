//! Shared storage plumbing

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataDirError {
    #[error("Data directory not found")]
    NotFound,
}

/// Get the default data directory
pub fn default_data_dir() -> Result<PathBuf, DataDirError> {
    dirs::data_local_dir()
        .map(|p| p.join("grind"))
        .ok_or(DataDirError::NotFound)
}

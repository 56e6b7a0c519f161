use std::io;

use thiserror::Error;

/// Failure reported by a [`crate::DurableStore`] backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("storage backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("malformed history payload: {0}")]
    StorageCorruption(#[from] serde_json::Error),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Outcome of a failed profile or records fetch, as seen by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    /// The remote lookup confirmed the profile does not exist.
    #[error("not found")]
    NotFound,
    #[error("fetch failed: {0}")]
    Transient(String),
}

impl FetchFailure {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchFailure::NotFound)
    }
}

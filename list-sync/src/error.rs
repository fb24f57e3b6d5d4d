//! Error types for list-sync

use thiserror::Error;

/// Result type for list-sync operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Reasons a load could not produce a publishable snapshot
///
/// These never escape the controller as panics; they are reported through
/// `LoadOutcome::Failed` and the boolean results of the load operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("No content provider attached")]
    NoProvider,

    #[error("Content fetch failed: {0}")]
    FetchFailure(String),

    #[error("Content root not found: {0}")]
    FetchNotFound(String),

    #[error("Load worker unavailable")]
    WorkerUnavailable,

    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

/// Error reported by a `ContentProvider` fetch
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The requested content root does not exist on the server
    #[error("not found: {0}")]
    NotFound(String),

    /// I/O or protocol failure talking to the server
    #[error("failure: {0}")]
    Failure(String),
}

impl From<FetchError> for SyncError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::NotFound(msg) => SyncError::FetchNotFound(msg),
            FetchError::Failure(msg) => SyncError::FetchFailure(msg),
        }
    }
}

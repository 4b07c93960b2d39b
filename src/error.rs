//! Error type shared by the planner, lifecycle manager and store.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed coordinates, ids, or enum values supplied by a caller.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("complaint not found: {0}")]
    NotFound(String),

    /// The store collaborator failed; never retried here.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// The store did not answer in time. The request may still have taken
    /// effect, so callers must not assume it failed.
    #[error("store timed out, outcome unknown: {0}")]
    Timeout(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }

    pub fn store(reason: impl Into<String>) -> Self {
        Self::StoreUnavailable(reason.into())
    }
}

//! Error types

use thiserror::Error;

/// Failure talking to the backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server responded {code}: {body}")]
    Status { code: u16, body: String },
    #[error("unexpected response: {0}")]
    Decode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Outcome of a rejected coordinator operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    /// Bad input, rejected before any request was sent
    #[error("{0}")]
    Validation(String),
    /// Target is not in the local cache; nothing was sent
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Transport(#[from] ApiError),
}

impl MutationError {
    /// True when the error was raised locally without touching the network
    pub fn is_local(&self) -> bool {
        !matches!(self, MutationError::Transport(_))
    }
}

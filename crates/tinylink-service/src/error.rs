use thiserror::Error;
use tinylink_core::{CoreError, StorageError};

#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// Malformed, oversized, or disallowed input URL. Always a
    /// client-facing rejection, never retried.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    /// Malformed user id on the token path.
    #[error("invalid user id: {0}")]
    InvalidUserId(String),
    /// The code-generation retry budget was exhausted. At 36^7 keyspace
    /// this indicates generator or keyspace health trouble, not bad
    /// input; it surfaces as service unavailability and is worth
    /// alerting on.
    #[error("short code collision retries exhausted")]
    CollisionRetryExhausted,
    /// Durable storage failed in a way the engine could not recover.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<CoreError> for ServiceError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidUrl(message) => Self::InvalidUrl(message),
            // resolve/remove swallow code parse failures as misses before
            // they reach this conversion; the arm keeps the match total.
            CoreError::InvalidShortCode(message) => Self::InvalidUrl(message),
            CoreError::InvalidUserId(message) => Self::InvalidUserId(message),
        }
    }
}

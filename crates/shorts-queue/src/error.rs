//! Queue error types.

use thiserror::Error;

pub type QueueResult<T> = Result<T, QueueError>;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Duplicate job: {0}")]
    Duplicate(String),

    #[error("Queue is closed")]
    Closed,
}

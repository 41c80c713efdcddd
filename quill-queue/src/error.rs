use thiserror::Error;

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;

/// Infrastructure errors for queue operations.
///
/// Receivers treat [`QueueError::Unavailable`] as a communication failure:
/// it feeds the worker's consecutive-error counter, not a message's
/// delivery-attempt counter.
#[derive(Error, Debug, Clone)]
pub enum QueueError {
    #[error("Queue unavailable: {0}")]
    Unavailable(String),

    #[error("Payload too large: {size} bytes (max: {max})")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("Internal error: {0}")]
    Internal(String),
}

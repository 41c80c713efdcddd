use thiserror::Error;

use quill_core::SourceError;
use quill_render::RenderError;
use quill_store::StoreError;

/// Result type for worker lifecycle operations
pub type WorkerResult<T> = Result<T, WorkerError>;

/// Terminal worker failures
#[derive(Error, Debug)]
pub enum WorkerError {
    /// The queue failed too many receives in a row. Exiting non-zero
    /// here is deliberate fail-fast: an external supervisor restarts the
    /// process rather than the loop spinning against a dead dependency.
    #[error("Queue unavailable after {consecutive} consecutive communication failures")]
    QueueUnavailable { consecutive: u32 },

    #[error("Worker task failed: {0}")]
    Join(String),
}

/// Why one job's processing attempt failed.
///
/// Every variant is handled the same way — the delivery stays
/// unacknowledged and redelivery retries the whole attempt — because
/// rendering is deterministic and the store write is
/// overwrite-idempotent, so repeating all three steps is always safe.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Record fetch failed: {0}")]
    Source(#[from] SourceError),

    #[error("Render failed: {0}")]
    Render(#[from] RenderError),

    #[error("Artifact persistence failed: {0}")]
    Store(#[from] StoreError),
}

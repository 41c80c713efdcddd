use thiserror::Error;

/// Errors in domain-type construction and parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown report kind: {0}")]
    UnknownReportKind(String),
}

/// Result type for record source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors surfaced by a record source.
///
/// The pipeline treats every source failure as transient for retry
/// purposes: the worker leaves the delivery unacknowledged and the queue
/// redelivers it.
#[derive(Error, Debug, Clone)]
pub enum SourceError {
    #[error("Record source unavailable: {0}")]
    Unavailable(String),

    #[error("Record source error: {0}")]
    Internal(String),
}

//! # quill-worker: the claim/process/acknowledge loop
//!
//! Each worker long-polls the queue for one message at a time, renders
//! the requested report, persists the artifact, and only then
//! acknowledges. The ordering is the correctness core of the pipeline:
//! render → persist → acknowledge, never acknowledge first, because an
//! acknowledged-then-crashed job would be silently lost while an
//! unacknowledged one merely redelivers.
//!
//! Failure handling follows the queue's lease semantics:
//!
//! - undecodable bodies are poison: acknowledged immediately, since no
//!   retry can ever succeed;
//! - processing failures (record fetch, render, persist) leave the
//!   delivery unacknowledged and the queue redelivers it until the
//!   dead-letter policy retires it;
//! - queue-communication failures feed a separate consecutive-error
//!   counter; at the ceiling the worker exits with an error so a
//!   supervisor can replace it.
//!
//! Horizontal scale comes from running more workers; a single worker
//! never processes more than one job concurrently.

pub mod config;
pub mod error;
pub mod pool;
pub mod worker;

pub use config::WorkerConfig;
pub use error::{ProcessError, WorkerError, WorkerResult};
pub use pool::WorkerPool;
pub use worker::ReportWorker;

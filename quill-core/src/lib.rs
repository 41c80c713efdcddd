//! Shared domain types for the Quill report pipeline.
//!
//! Everything that more than one pipeline crate needs to agree on lives
//! here: the identifiers, the immutable [`JobDescriptor`] that travels
//! through the queue, the [`TaskRecord`] shape the renderer reads, and the
//! [`RecordSource`] seam through which workers fetch an owner's records.
//!
//! The pipeline itself (queue, store, renderer, workers, HTTP surface) is
//! split across the sibling `quill-*` crates; this crate carries no
//! behavior beyond construction and parsing.

pub mod descriptor;
pub mod error;
pub mod ids;
pub mod record;
pub mod source;

pub use descriptor::{JobDescriptor, ReportKind};
pub use error::{DomainError, SourceError, SourceResult};
pub use ids::{JobId, OwnerId};
pub use record::{TaskPriority, TaskRecord, TaskStatus};
pub use source::{FailingRecordSource, InMemoryRecordSource, RecordSource};

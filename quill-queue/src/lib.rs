//! # quill-queue: durable at-least-once job delivery
//!
//! The message channel between report submission and the worker pool.
//! Semantics are lease-based rather than push-based:
//!
//! - `enqueue` durably accepts an opaque message body; failure is
//!   synchronous, there is no partial enqueue.
//! - `receive` long-polls and hands out deliveries under a visibility
//!   timeout. A delivered message is invisible to other receivers until
//!   the timeout lapses or the delivery is acknowledged.
//! - `acknowledge` permanently removes a message and is idempotent:
//!   unknown, expired, or superseded receipts are a no-op.
//! - Redelivery is the only retry mechanism. A crashed receiver simply
//!   lets its lease lapse; no heartbeat protocol exists. The price is
//!   at-least-once delivery, so consumers must be overwrite-idempotent.
//! - A message delivered `max_receive_count` times without acknowledgement
//!   moves to the dead-letter channel instead of being redelivered again.
//!
//! Message bodies are opaque bytes; payload schemas belong to the
//! producing and consuming crates. Lifecycle transitions are broadcast as
//! [`QueueEvent`]s for observability.

pub mod backend;
pub mod config;
pub mod error;
pub mod types;

pub use backend::memory::MemoryQueue;
pub use backend::{BoxStream, JobQueue};
pub use config::QueueConfig;
pub use error::{QueueError, QueueResult};
pub use types::{Delivery, Message, MessageId, QueueEvent, ReceiptHandle};

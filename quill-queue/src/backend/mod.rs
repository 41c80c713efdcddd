pub mod memory;

use async_trait::async_trait;
use futures_core::Stream;
use std::pin::Pin;
use std::time::Duration;

use crate::{Delivery, Message, MessageId, QueueEvent, QueueResult, ReceiptHandle};

/// Type alias for boxed streams (stable Rust compatible)
pub type BoxStream<T> = Pin<Box<dyn Stream<Item = T> + Send + 'static>>;

/// The durable job channel between submitters and workers.
///
/// At-least-once semantics: a delivery that is never acknowledged becomes
/// receivable again once its visibility timeout lapses, until the
/// dead-letter policy retires it.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Durably accept a message body. No partial enqueue: an `Ok` means
    /// the message will be delivered at least once.
    async fn enqueue(&self, body: Vec<u8>) -> QueueResult<MessageId>;

    /// Long-poll for up to `max_messages` deliveries, waiting at most
    /// `wait` for one to become eligible. Each delivery is invisible to
    /// other receivers for `visibility` from delivery time, and carries
    /// its cumulative receive count.
    async fn receive(
        &self,
        max_messages: usize,
        wait: Duration,
        visibility: Duration,
    ) -> QueueResult<Vec<Delivery>>;

    /// Permanently remove the delivered message. Idempotent: receipts
    /// that are unknown, expired, or superseded by redelivery are a
    /// no-op, not an error.
    async fn acknowledge(&self, receipt: &ReceiptHandle) -> QueueResult<()>;

    /// Messages retired after exhausting their delivery attempts. This is
    /// the pipeline's only durable terminal-failure signal.
    async fn dead_letters(&self) -> QueueResult<Vec<Message>>;

    /// Size of the dead-letter channel, for metrics probes
    async fn dead_letter_count(&self) -> QueueResult<usize> {
        Ok(self.dead_letters().await?.len())
    }

    /// Event stream for observability (boxed for stable Rust)
    fn event_stream(&self) -> BoxStream<QueueEvent>;
}

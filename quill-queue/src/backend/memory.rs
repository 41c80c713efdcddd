use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::{broadcast, Notify};
use tracing::{debug, warn};

use crate::backend::{BoxStream, JobQueue};
use crate::{
    Delivery, Message, MessageId, QueueConfig, QueueEvent, QueueResult, ReceiptHandle,
};

/// Granularity at which a long-poll re-checks for messages whose
/// visibility timeout has lapsed (expiry is lazy; nothing fires a wakeup)
const POLL_INTERVAL: Duration = Duration::from_millis(50);

struct StoredMessage {
    message: Message,
    receive_count: u32,
    visible_at: DateTime<Utc>,
    receipt: Option<ReceiptHandle>,
}

struct Inner {
    /// Delivery order; invisible messages stay in place and are skipped
    order: VecDeque<MessageId>,
    messages: HashMap<MessageId, StoredMessage>,
    dead: Vec<Message>,
}

/// In-memory queue for tests and single-process deployments.
///
/// Visibility expiry is evaluated lazily at receive time: eligibility is a
/// clock comparison, so no reaper task is needed. Long-polling wakes
/// immediately on enqueue and otherwise re-scans every [`POLL_INTERVAL`]
/// to pick up lapsed leases.
pub struct MemoryQueue {
    inner: Arc<Mutex<Inner>>,
    notify: Arc<Notify>,
    events: broadcast::Sender<QueueEvent>,
    config: QueueConfig,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    pub fn with_config(config: QueueConfig) -> Self {
        let (events, _) = broadcast::channel(1000);
        Self {
            inner: Arc::new(Mutex::new(Inner {
                order: VecDeque::new(),
                messages: HashMap::new(),
                dead: Vec::new(),
            })),
            notify: Arc::new(Notify::new()),
            events,
            config,
        }
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// One pass over the queue: dead-letter exhausted messages, lease out
    /// up to `max_messages` eligible ones.
    fn claim_visible(&self, max_messages: usize, visibility: Duration) -> Vec<Delivery> {
        let now = Utc::now();
        let visibility = chrono::Duration::from_std(visibility)
            .unwrap_or_else(|_| chrono::Duration::seconds(300));
        let mut inner = self.inner.lock();
        let mut deliveries = Vec::new();
        let mut retained = VecDeque::with_capacity(inner.order.len());

        while let Some(message_id) = inner.order.pop_front() {
            let Some(stored) = inner.messages.get_mut(&message_id) else {
                continue; // acknowledged while queued for a later scan
            };

            if stored.visible_at > now || deliveries.len() >= max_messages {
                retained.push_back(message_id);
                continue;
            }

            if stored.receive_count >= self.config.max_receive_count {
                // Exhausted its attempts: retire instead of redelivering
                let stored = inner.messages.remove(&message_id).unwrap();
                warn!(
                    message_id = %message_id,
                    receive_count = stored.receive_count,
                    "message exhausted delivery attempts, moving to dead-letter channel"
                );
                let _ = self.events.send(QueueEvent::DeadLettered {
                    message_id: message_id.clone(),
                    receive_count: stored.receive_count,
                    at: now,
                });
                inner.dead.push(stored.message);
                continue;
            }

            stored.receive_count += 1;
            stored.visible_at = now + visibility;
            let receipt = ReceiptHandle::new();
            stored.receipt = Some(receipt.clone());

            let _ = self.events.send(QueueEvent::Delivered {
                message_id: message_id.clone(),
                receive_count: stored.receive_count,
                visible_again_at: stored.visible_at,
                at: now,
            });

            deliveries.push(Delivery {
                message: stored.message.clone(),
                receipt,
                receive_count: stored.receive_count,
                visible_again_at: stored.visible_at,
            });
            retained.push_back(message_id);
        }

        inner.order = retained;
        deliveries
    }

    /// Force a message's lease to lapse (test helper)
    pub fn force_visibility_expiry(&self, message_id: &MessageId) {
        let mut inner = self.inner.lock();
        if let Some(stored) = inner.messages.get_mut(message_id) {
            stored.visible_at = Utc::now() - chrono::Duration::seconds(1);
        }
        drop(inner);
        self.notify.notify_waiters();
    }

    /// Current receive count of a queued message (test helper)
    pub fn receive_count(&self, message_id: &MessageId) -> Option<u32> {
        self.inner
            .lock()
            .messages
            .get(message_id)
            .map(|stored| stored.receive_count)
    }

    /// Number of messages still held by the main channel (test helper)
    pub fn len(&self) -> usize {
        self.inner.lock().messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobQueue for MemoryQueue {
    async fn enqueue(&self, body: Vec<u8>) -> QueueResult<MessageId> {
        if body.len() > self.config.max_payload_bytes {
            return Err(crate::QueueError::PayloadTooLarge {
                size: body.len(),
                max: self.config.max_payload_bytes,
            });
        }

        let message = Message::new(body);
        let message_id = message.message_id.clone();
        let enqueued_at = message.enqueued_at;

        {
            let mut inner = self.inner.lock();
            inner.messages.insert(
                message_id.clone(),
                StoredMessage {
                    message,
                    receive_count: 0,
                    visible_at: enqueued_at,
                    receipt: None,
                },
            );
            inner.order.push_back(message_id.clone());
        }

        let _ = self.events.send(QueueEvent::Enqueued {
            message_id: message_id.clone(),
            at: enqueued_at,
        });
        debug!(message_id = %message_id, "message enqueued");
        self.notify.notify_waiters();

        Ok(message_id)
    }

    async fn receive(
        &self,
        max_messages: usize,
        wait: Duration,
        visibility: Duration,
    ) -> QueueResult<Vec<Delivery>> {
        let deadline = tokio::time::Instant::now() + wait;

        loop {
            let deliveries = self.claim_visible(max_messages, visibility);
            if !deliveries.is_empty() {
                return Ok(deliveries);
            }

            let now = tokio::time::Instant::now();
            if now >= deadline {
                return Ok(Vec::new());
            }

            // Wake early on enqueue; cap the slice so lapsed visibility
            // timeouts are noticed without their own wakeup source.
            let slice = POLL_INTERVAL.min(deadline - now);
            let notified = self.notify.notified();
            let _ = tokio::time::timeout(slice, notified).await;
        }
    }

    async fn acknowledge(&self, receipt: &ReceiptHandle) -> QueueResult<()> {
        let mut inner = self.inner.lock();

        let found = inner
            .messages
            .iter()
            .find(|(_, stored)| stored.receipt.as_ref() == Some(receipt))
            .map(|(message_id, _)| message_id.clone());

        // Stale or unknown receipt: the message was already removed, or
        // redelivery superseded this receipt. Either way a no-op.
        let Some(message_id) = found else {
            debug!(receipt = %receipt, "acknowledge on stale receipt ignored");
            return Ok(());
        };

        inner.messages.remove(&message_id);
        inner.order.retain(|id| id != &message_id);

        let _ = self.events.send(QueueEvent::Acknowledged {
            message_id: message_id.clone(),
            at: Utc::now(),
        });
        debug!(message_id = %message_id, "message acknowledged");

        Ok(())
    }

    async fn dead_letters(&self) -> QueueResult<Vec<Message>> {
        Ok(self.inner.lock().dead.clone())
    }

    fn event_stream(&self) -> BoxStream<QueueEvent> {
        let receiver = self.events.subscribe();
        use tokio_stream::{wrappers::BroadcastStream, StreamExt};
        let stream = BroadcastStream::new(receiver).filter_map(|result| result.ok());

        Box::pin(stream)
    }
}

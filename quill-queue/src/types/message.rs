use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MessageId, ReceiptHandle};

/// Immutable message data as accepted at enqueue time.
///
/// The body is opaque to the queue; delivery bookkeeping (receive count,
/// visibility) is queue-managed metadata, never part of the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier
    pub message_id: MessageId,

    /// Serialized payload (opaque bytes)
    pub body: Vec<u8>,

    /// When the message was accepted
    pub enqueued_at: DateTime<Utc>,
}

impl Message {
    pub fn new(body: Vec<u8>) -> Self {
        Self {
            message_id: MessageId::new(),
            body,
            enqueued_at: Utc::now(),
        }
    }
}

/// One delivery of a message to one receiver: the lease.
///
/// Exclusive until `visible_again_at`; the receipt is required to
/// acknowledge and is invalidated by redelivery.
#[derive(Debug, Clone)]
pub struct Delivery {
    /// The delivered message
    pub message: Message,

    /// Receipt for acknowledging this delivery
    pub receipt: ReceiptHandle,

    /// How many times this message has been delivered, this one included
    pub receive_count: u32,

    /// When the message becomes eligible for redelivery if unacknowledged
    pub visible_again_at: DateTime<Utc>,
}

impl Delivery {
    /// Check whether the lease is still held
    pub fn lease_valid(&self, now: DateTime<Utc>) -> bool {
        self.visible_again_at > now
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MessageId;

/// Minimal stable event protocol for structured observability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum QueueEvent {
    /// Message was accepted into the queue
    Enqueued {
        message_id: MessageId,
        at: DateTime<Utc>,
    },

    /// Message was delivered to a receiver under a lease
    Delivered {
        message_id: MessageId,
        receive_count: u32,
        visible_again_at: DateTime<Utc>,
        at: DateTime<Utc>,
    },

    /// Message was acknowledged and removed
    Acknowledged {
        message_id: MessageId,
        at: DateTime<Utc>,
    },

    /// Message exhausted its delivery attempts and moved to the
    /// dead-letter channel
    DeadLettered {
        message_id: MessageId,
        receive_count: u32,
        at: DateTime<Utc>,
    },
}

impl QueueEvent {
    /// Get event type name as string
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Enqueued { .. } => "enqueued",
            Self::Delivered { .. } => "delivered",
            Self::Acknowledged { .. } => "acknowledged",
            Self::DeadLettered { .. } => "dead_lettered",
        }
    }

    /// Get the message ID from any event
    pub fn message_id(&self) -> &MessageId {
        match self {
            Self::Enqueued { message_id, .. } => message_id,
            Self::Delivered { message_id, .. } => message_id,
            Self::Acknowledged { message_id, .. } => message_id,
            Self::DeadLettered { message_id, .. } => message_id,
        }
    }
}

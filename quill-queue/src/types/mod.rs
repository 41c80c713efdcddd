mod events;
mod ids;
mod message;

pub use events::QueueEvent;
pub use ids::{MessageId, ReceiptHandle};
pub use message::{Delivery, Message};

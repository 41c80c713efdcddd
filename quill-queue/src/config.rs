/// Queue policy knobs
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Deliveries a message may consume before it is dead-lettered
    pub max_receive_count: u32,

    /// Upper bound on message body size
    pub max_payload_bytes: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_receive_count: 3,
            max_payload_bytes: 256 * 1024,
        }
    }
}

impl QueueConfig {
    pub fn with_max_receive_count(mut self, max_receive_count: u32) -> Self {
        self.max_receive_count = max_receive_count;
        self
    }
}

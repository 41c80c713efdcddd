use std::str::FromStr;
use std::time::Duration;

/// Worker loop tuning.
///
/// The visibility timeout must be sized well above the worst-case render
/// duration (target: at least 5x the p99), otherwise a slow-but-successful
/// render is redelivered mid-flight and the store absorbs a duplicate
/// write.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Messages per receive. 1 keeps acknowledgement per-message and the
    /// loop simple; larger batches gain little for CPU-bound work.
    pub max_messages: usize,

    /// Long-poll wait when the queue is idle
    pub wait: Duration,

    /// Visibility timeout requested with each receive
    pub visibility: Duration,

    /// Consecutive queue-communication failures before the worker exits
    pub max_consecutive_errors: u32,

    /// Pause between failed receives, to avoid a tight error loop
    pub error_backoff: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_messages: 1,
            wait: Duration::from_secs(20),
            visibility: Duration::from_secs(300),
            max_consecutive_errors: 5,
            error_backoff: Duration::from_secs(5),
        }
    }
}

impl WorkerConfig {
    /// Load overrides from `QUILL_WORKER_*` environment variables,
    /// falling back to defaults per knob
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(secs) = env_parse("QUILL_WORKER_WAIT_SECONDS") {
            config.wait = Duration::from_secs(secs);
        }
        if let Some(secs) = env_parse("QUILL_WORKER_VISIBILITY_SECONDS") {
            config.visibility = Duration::from_secs(secs);
        }
        if let Some(count) = env_parse("QUILL_WORKER_MAX_CONSECUTIVE_ERRORS") {
            config.max_consecutive_errors = count;
        }
        if let Some(secs) = env_parse("QUILL_WORKER_ERROR_BACKOFF_SECONDS") {
            config.error_backoff = Duration::from_secs(secs);
        }
        config
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok()?.parse().ok()
}

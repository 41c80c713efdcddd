use std::sync::Arc;

use quill_queue::JobQueue;
use quill_store::ArtifactStore;

/// Shared handles behind every route handler
#[derive(Clone)]
pub struct ApiState {
    pub queue: Arc<dyn JobQueue>,
    pub store: Arc<dyn ArtifactStore>,
}

impl ApiState {
    pub fn new(queue: Arc<dyn JobQueue>, store: Arc<dyn ArtifactStore>) -> Self {
        Self { queue, store }
    }
}

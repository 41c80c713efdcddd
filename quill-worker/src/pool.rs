use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use quill_core::RecordSource;
use quill_queue::JobQueue;
use quill_store::ArtifactStore;

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::worker::ReportWorker;

/// A set of independent workers sharing nothing but the queue and store.
///
/// Scaling is horizontal: more workers, never intra-worker parallelism.
/// Shutdown stops new leases immediately, grants in-flight messages a
/// bounded grace period, then abandons stragglers to natural lease
/// expiry — the queue's redelivery already recovers them.
pub struct WorkerPool {
    shutdown_tx: watch::Sender<bool>,
    handles: Vec<JoinHandle<WorkerResult<()>>>,
    grace: Duration,
}

impl WorkerPool {
    /// Spawn `count` workers over shared collaborators
    pub fn spawn(
        count: usize,
        queue: Arc<dyn JobQueue>,
        store: Arc<dyn ArtifactStore>,
        source: Arc<dyn RecordSource>,
        config: WorkerConfig,
    ) -> Self {
        Self::spawn_with_grace(count, queue, store, source, config, Duration::from_secs(30))
    }

    pub fn spawn_with_grace(
        count: usize,
        queue: Arc<dyn JobQueue>,
        store: Arc<dyn ArtifactStore>,
        source: Arc<dyn RecordSource>,
        config: WorkerConfig,
        grace: Duration,
    ) -> Self {
        let (shutdown_tx, _) = watch::channel(false);

        let handles = (0..count)
            .map(|index| {
                let worker = ReportWorker::new(
                    queue.clone(),
                    store.clone(),
                    source.clone(),
                    config.clone(),
                )
                .with_index(index);
                let shutdown_rx = shutdown_tx.subscribe();
                tokio::spawn(async move { worker.run(shutdown_rx).await })
            })
            .collect();

        info!(count, "worker pool started");

        Self {
            shutdown_tx,
            handles,
            grace,
        }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Signal every worker, wait out the grace period, abort stragglers.
    /// Returns each worker's exit result in spawn order.
    pub async fn shutdown(self) -> Vec<WorkerResult<()>> {
        info!("worker pool shutting down, waiting for in-flight work");
        let _ = self.shutdown_tx.send(true);

        let mut results = Vec::with_capacity(self.handles.len());
        for (index, mut handle) in self.handles.into_iter().enumerate() {
            match tokio::time::timeout(self.grace, &mut handle).await {
                Ok(join_result) => results.push(
                    join_result.unwrap_or_else(|e| Err(WorkerError::Join(e.to_string()))),
                ),
                Err(_) => {
                    warn!(
                        worker = index,
                        grace_secs = self.grace.as_secs(),
                        "worker exceeded shutdown grace, aborting; in-flight message recovers via lease expiry"
                    );
                    handle.abort();
                    results.push(Err(WorkerError::Join(
                        "aborted after shutdown grace period".to_string(),
                    )));
                }
            }
        }

        info!("worker pool stopped");
        results
    }
}

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use quill_core::{JobDescriptor, RecordSource};
use quill_queue::{Delivery, JobQueue};
use quill_render::ReportRenderer;
use quill_store::{artifact_key, ArtifactStore};

use crate::config::WorkerConfig;
use crate::error::{ProcessError, WorkerError, WorkerResult};

/// One report worker: a single-flight lease/render/persist/acknowledge
/// loop over the shared queue
pub struct ReportWorker {
    queue: Arc<dyn JobQueue>,
    store: Arc<dyn ArtifactStore>,
    source: Arc<dyn RecordSource>,
    renderer: ReportRenderer,
    config: WorkerConfig,
    index: usize,
}

impl ReportWorker {
    pub fn new(
        queue: Arc<dyn JobQueue>,
        store: Arc<dyn ArtifactStore>,
        source: Arc<dyn RecordSource>,
        config: WorkerConfig,
    ) -> Self {
        Self {
            queue,
            store,
            source,
            renderer: ReportRenderer::new(),
            config,
            index: 0,
        }
    }

    /// Tag log lines with a pool slot
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    /// Run until the shutdown signal flips or queue communication is
    /// declared dead. A signal received mid-processing lets the in-flight
    /// message finish; it only stops further receives.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> WorkerResult<()> {
        info!(
            worker = self.index,
            wait_secs = self.config.wait.as_secs(),
            visibility_secs = self.config.visibility.as_secs(),
            "worker ready, polling queue for messages"
        );

        let mut consecutive_errors: u32 = 0;

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = shutdown.changed() => break,

                received = self.queue.receive(
                    self.config.max_messages,
                    self.config.wait,
                    self.config.visibility,
                ) => {
                    match received {
                        Ok(deliveries) => {
                            consecutive_errors = 0;
                            for delivery in deliveries {
                                self.handle_delivery(delivery).await;
                            }
                        }
                        Err(e) => {
                            consecutive_errors += 1;
                            warn!(
                                worker = self.index,
                                error = %e,
                                consecutive = consecutive_errors,
                                max = self.config.max_consecutive_errors,
                                "queue receive failed"
                            );
                            if consecutive_errors >= self.config.max_consecutive_errors {
                                error!(
                                    worker = self.index,
                                    "too many consecutive queue failures, exiting"
                                );
                                return Err(WorkerError::QueueUnavailable {
                                    consecutive: consecutive_errors,
                                });
                            }
                            tokio::time::sleep(self.config.error_backoff).await;
                        }
                    }
                }
            }
        }

        info!(worker = self.index, "worker stopped");
        Ok(())
    }

    /// Process one delivery end to end. Never propagates message-level
    /// errors: the acknowledge/no-acknowledge decision IS the error
    /// handling.
    async fn handle_delivery(&self, delivery: Delivery) {
        let descriptor: JobDescriptor = match serde_json::from_slice(&delivery.message.body) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                // Poison: a body that never decodes can never succeed,
                // so retrying would only burn delivery attempts
                error!(
                    worker = self.index,
                    message_id = %delivery.message.message_id,
                    error = %e,
                    "poison message, acknowledging without processing"
                );
                if let Err(ack_err) = self.queue.acknowledge(&delivery.receipt).await {
                    warn!(error = %ack_err, "failed to acknowledge poison message");
                }
                return;
            }
        };

        info!(
            worker = self.index,
            job_id = %descriptor.job_id,
            owner_id = %descriptor.owner_id,
            attempt = delivery.receive_count,
            "processing report job"
        );

        match self.process_job(&descriptor).await {
            Ok(key) => {
                // The artifact is durable; only now may the message go
                if let Err(e) = self.queue.acknowledge(&delivery.receipt).await {
                    warn!(
                        job_id = %descriptor.job_id,
                        error = %e,
                        "acknowledge failed; redelivery will converge on the same artifact"
                    );
                } else {
                    info!(
                        worker = self.index,
                        job_id = %descriptor.job_id,
                        key,
                        "report job completed"
                    );
                }
            }
            Err(e) => {
                error!(
                    worker = self.index,
                    job_id = %descriptor.job_id,
                    attempt = delivery.receive_count,
                    error = %e,
                    "report job failed, leaving delivery for redelivery"
                );
            }
        }
    }

    /// Fetch → render → persist. Returns the artifact key on success.
    async fn process_job(&self, descriptor: &JobDescriptor) -> Result<String, ProcessError> {
        let records = self.source.records_for(&descriptor.owner_id).await?;
        debug!(job_id = %descriptor.job_id, records = records.len(), "records fetched");

        let report = self.renderer.render(descriptor, &records)?;

        let key = artifact_key(descriptor.owner_id.as_str(), descriptor.job_id.as_str());
        self.store
            .put(&key, Bytes::from(report.bytes), report.content_type)
            .await?;

        Ok(key)
    }
}

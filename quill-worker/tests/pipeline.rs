use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use quill_core::{
    FailingRecordSource, InMemoryRecordSource, JobDescriptor, OwnerId, ReportKind, TaskPriority,
    TaskRecord, TaskStatus,
};
use quill_queue::{
    BoxStream, Delivery, JobQueue, Message, MessageId, MemoryQueue, QueueConfig, QueueError,
    QueueEvent, QueueResult, ReceiptHandle,
};
use quill_store::{artifact_key, ArtifactStore, MemoryStore};
use quill_worker::{WorkerConfig, WorkerError, WorkerPool};

fn fast_config() -> WorkerConfig {
    WorkerConfig {
        max_messages: 1,
        wait: Duration::from_millis(50),
        visibility: Duration::from_millis(400),
        max_consecutive_errors: 3,
        error_backoff: Duration::from_millis(10),
    }
}

fn descriptor(owner: &OwnerId) -> JobDescriptor {
    JobDescriptor::new(owner.clone(), ReportKind::TaskSummary).with_context("origin", "test")
}

async fn enqueue_descriptor(queue: &MemoryQueue, descriptor: &JobDescriptor) {
    queue
        .enqueue(serde_json::to_vec(descriptor).unwrap())
        .await
        .unwrap();
}

/// Poll until `probe` yields true or the deadline passes
async fn wait_until<F, Fut>(deadline: Duration, mut probe: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let give_up = tokio::time::Instant::now() + deadline;
    loop {
        if probe().await {
            return true;
        }
        if tokio::time::Instant::now() >= give_up {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn submitted_job_produces_exactly_one_artifact() {
    let queue = Arc::new(MemoryQueue::new());
    let store = Arc::new(MemoryStore::new());
    let source = Arc::new(InMemoryRecordSource::new());

    let owner = OwnerId::new("user-1");
    source.seed(
        owner.clone(),
        vec![
            TaskRecord::new(owner.clone(), "ship release")
                .with_status(TaskStatus::Done)
                .with_priority(TaskPriority::High),
            TaskRecord::new(owner.clone(), "write changelog")
                .with_status(TaskStatus::InProgress)
                .with_priority(TaskPriority::Medium),
            TaskRecord::new(owner.clone(), "plan retro")
                .with_status(TaskStatus::Todo)
                .with_priority(TaskPriority::Low),
        ],
    );

    let job = descriptor(&owner);
    enqueue_descriptor(&queue, &job).await;

    let pool = WorkerPool::spawn_with_grace(
        1,
        queue.clone(),
        store.clone(),
        source,
        fast_config(),
        Duration::from_secs(2),
    );

    let key = artifact_key(owner.as_str(), job.job_id.as_str());
    let completed = wait_until(Duration::from_secs(5), || {
        let store = store.clone();
        let key = key.clone();
        async move { store.exists(&key).await.unwrap() }
    })
    .await;
    assert!(completed, "artifact never appeared");

    // Processed message must be gone from the main channel
    assert!(wait_until(Duration::from_secs(2), || {
        let queue = queue.clone();
        async move { queue.is_empty() }
    })
    .await);

    let artifact = store.get(&key).await.unwrap();
    assert_eq!(artifact.content_type, "application/pdf");
    assert!(artifact.bytes.starts_with(b"%PDF"));
    assert_eq!(store.len(), 1);

    for result in pool.shutdown().await {
        result.unwrap();
    }
}

#[tokio::test]
async fn owner_with_no_records_still_gets_a_report() {
    let queue = Arc::new(MemoryQueue::new());
    let store = Arc::new(MemoryStore::new());
    let source = Arc::new(InMemoryRecordSource::new());

    let owner = OwnerId::new("empty-owner");
    let job = descriptor(&owner);
    enqueue_descriptor(&queue, &job).await;

    let pool = WorkerPool::spawn_with_grace(
        1,
        queue.clone(),
        store.clone(),
        source,
        fast_config(),
        Duration::from_secs(2),
    );

    let key = artifact_key(owner.as_str(), job.job_id.as_str());
    assert!(wait_until(Duration::from_secs(5), || {
        let store = store.clone();
        let key = key.clone();
        async move { store.exists(&key).await.unwrap() }
    })
    .await);

    pool.shutdown().await;
}

#[tokio::test]
async fn crashed_worker_lease_is_redelivered_and_converges_on_one_artifact() {
    let queue = Arc::new(MemoryQueue::new());
    let store = Arc::new(MemoryStore::new());
    let source = Arc::new(InMemoryRecordSource::new());

    let owner = OwnerId::new("user-1");
    source.seed(owner.clone(), vec![TaskRecord::new(owner.clone(), "task")]);

    let job = descriptor(&owner);
    let message_id = queue
        .enqueue(serde_json::to_vec(&job).unwrap())
        .await
        .unwrap();

    // First "worker" leases the message and dies without acknowledging
    let stolen = queue
        .receive(1, Duration::ZERO, Duration::from_secs(30))
        .await
        .unwrap();
    assert_eq!(stolen.len(), 1);
    assert_eq!(stolen[0].receive_count, 1);
    queue.force_visibility_expiry(&message_id);

    // A healthy worker picks up the redelivery
    let pool = WorkerPool::spawn_with_grace(
        1,
        queue.clone(),
        store.clone(),
        source,
        fast_config(),
        Duration::from_secs(2),
    );

    let key = artifact_key(owner.as_str(), job.job_id.as_str());
    assert!(wait_until(Duration::from_secs(5), || {
        let store = store.clone();
        let key = key.clone();
        async move { store.exists(&key).await.unwrap() }
    })
    .await);

    // Exactly one artifact, message fully consumed, nothing dead-lettered
    assert_eq!(store.len(), 1);
    assert!(wait_until(Duration::from_secs(2), || {
        let queue = queue.clone();
        async move { queue.is_empty() }
    })
    .await);
    assert_eq!(queue.dead_letter_count().await.unwrap(), 0);

    pool.shutdown().await;
}

#[tokio::test]
async fn poison_message_is_acknowledged_without_retry() {
    let queue = Arc::new(MemoryQueue::new());
    let store = Arc::new(MemoryStore::new());
    let source = Arc::new(InMemoryRecordSource::new());

    queue.enqueue(b"not json at all".to_vec()).await.unwrap();

    let pool = WorkerPool::spawn_with_grace(
        1,
        queue.clone(),
        store.clone(),
        source,
        fast_config(),
        Duration::from_secs(2),
    );

    // The poison message is removed from the main channel without ever
    // reaching the dead-letter path, and produces no artifact
    assert!(wait_until(Duration::from_secs(5), || {
        let queue = queue.clone();
        async move { queue.is_empty() }
    })
    .await);
    assert_eq!(queue.dead_letter_count().await.unwrap(), 0);
    assert!(store.is_empty());

    pool.shutdown().await;
}

#[tokio::test]
async fn repeated_processing_failure_lands_in_dead_letter_channel() {
    let queue = Arc::new(MemoryQueue::with_config(
        QueueConfig::default().with_max_receive_count(2),
    ));
    let store = Arc::new(MemoryStore::new());
    let source = Arc::new(FailingRecordSource::new("record service down"));

    let owner = OwnerId::new("user-1");
    let job = descriptor(&owner);
    let message_id = queue
        .enqueue(serde_json::to_vec(&job).unwrap())
        .await
        .unwrap();

    let mut config = fast_config();
    config.visibility = Duration::from_millis(100);

    let pool = WorkerPool::spawn_with_grace(
        1,
        queue.clone(),
        store.clone(),
        source,
        config,
        Duration::from_secs(2),
    );

    // Two failed deliveries exhaust the policy; the third eligibility
    // check retires the message instead of redelivering it
    assert!(wait_until(Duration::from_secs(5), || {
        let queue = queue.clone();
        async move { queue.dead_letter_count().await.unwrap() == 1 }
    })
    .await);

    let dead = queue.dead_letters().await.unwrap();
    assert_eq!(dead[0].message_id, message_id);
    assert!(queue.is_empty());
    assert!(store.is_empty(), "failed job must not leave an artifact");

    pool.shutdown().await;
}

#[tokio::test]
async fn shutdown_stops_an_idle_pool_promptly() {
    let queue = Arc::new(MemoryQueue::new());
    let store = Arc::new(MemoryStore::new());
    let source = Arc::new(InMemoryRecordSource::new());

    let pool = WorkerPool::spawn_with_grace(
        2,
        queue,
        store,
        source,
        fast_config(),
        Duration::from_secs(2),
    );
    assert_eq!(pool.len(), 2);

    let results = tokio::time::timeout(Duration::from_secs(3), pool.shutdown())
        .await
        .expect("shutdown should finish inside the grace period");
    assert_eq!(results.len(), 2);
    for result in results {
        result.unwrap();
    }
}

/// Queue stub whose receive path is permanently broken, for the
/// fail-fast ceiling
struct BrokenQueue;

#[async_trait]
impl JobQueue for BrokenQueue {
    async fn enqueue(&self, _body: Vec<u8>) -> QueueResult<MessageId> {
        Ok(MessageId::new())
    }

    async fn receive(
        &self,
        _max_messages: usize,
        _wait: Duration,
        _visibility: Duration,
    ) -> QueueResult<Vec<Delivery>> {
        Err(QueueError::Unavailable("connection refused".to_string()))
    }

    async fn acknowledge(&self, _receipt: &ReceiptHandle) -> QueueResult<()> {
        Ok(())
    }

    async fn dead_letters(&self) -> QueueResult<Vec<Message>> {
        Ok(Vec::new())
    }

    fn event_stream(&self) -> BoxStream<QueueEvent> {
        Box::pin(tokio_stream::empty())
    }
}

#[tokio::test]
async fn persistent_queue_failure_exits_the_worker_nonzero() {
    let store = Arc::new(MemoryStore::new());
    let source = Arc::new(InMemoryRecordSource::new());

    let pool = WorkerPool::spawn_with_grace(
        1,
        Arc::new(BrokenQueue),
        store,
        source,
        fast_config(),
        Duration::from_secs(2),
    );

    // The worker hits its consecutive-failure ceiling on its own; no
    // shutdown signal is involved in the exit
    tokio::time::sleep(Duration::from_millis(300)).await;
    let results = pool.shutdown().await;
    assert!(matches!(
        results[0],
        Err(WorkerError::QueueUnavailable { consecutive: 3 })
    ));
}

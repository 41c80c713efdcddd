//! quill-server: single-process composition of the report pipeline.
//!
//! Wires the in-process queue, the filesystem artifact store, and the
//! record source together, spawns the worker pool, and serves the HTTP
//! surface until ctrl-c. Multi-process deployments swap the queue and
//! store implementations; the wiring shape stays the same.

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use quill_api::{router, ApiState, ServerConfig};
use quill_core::InMemoryRecordSource;
use quill_queue::MemoryQueue;
use quill_store::FsStore;
use quill_worker::{WorkerConfig, WorkerPool};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();
    let worker_config = WorkerConfig::from_env();
    info!(
        bind = %config.bind,
        data_dir = %config.data_dir.display(),
        workers = config.worker_count,
        "starting quill-server"
    );

    let queue = Arc::new(MemoryQueue::new());
    let store = Arc::new(FsStore::new(config.data_dir.clone()));
    let source = Arc::new(InMemoryRecordSource::new());

    let pool = WorkerPool::spawn(
        config.worker_count,
        queue.clone(),
        store.clone(),
        source,
        worker_config,
    );

    let app = router(ApiState::new(queue, store));
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(addr = %listener.local_addr()?, "http surface listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;

    for result in pool.shutdown().await {
        if let Err(e) = result {
            warn!(error = %e, "worker exited abnormally");
        }
    }

    Ok(())
}

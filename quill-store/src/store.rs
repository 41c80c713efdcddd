use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::StoreResult;

/// A stored artifact: the durable record of a completed job
#[derive(Debug, Clone)]
pub struct Artifact {
    pub key: String,
    pub bytes: Bytes,
    pub content_type: String,
    pub created_at: DateTime<Utc>,
}

/// Metadata about an artifact without its content
#[derive(Debug, Clone)]
pub struct ArtifactHead {
    pub key: String,
    pub size_bytes: u64,
    pub content_type: String,
    pub created_at: DateTime<Utc>,
}

/// Durable key/value byte storage for generated artifacts.
///
/// `put` on an existing key replaces its content; duplicate writes from
/// redelivered jobs converge rather than accumulate.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Durably store bytes under `key`, overwriting any previous content
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> StoreResult<()>;

    /// Fetch an artifact, or [`StoreError::NotFound`](crate::StoreError::NotFound)
    async fn get(&self, key: &str) -> StoreResult<Artifact>;

    /// Whether `key` holds an artifact. This is the canonical completion
    /// probe for the status surface.
    async fn exists(&self, key: &str) -> StoreResult<bool>;

    /// Metadata without content
    async fn head(&self, key: &str) -> StoreResult<ArtifactHead>;

    /// Remove an artifact; removing a missing key is a no-op
    async fn delete(&self, key: &str) -> StoreResult<()>;
}

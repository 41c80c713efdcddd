use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use parking_lot::RwLock;

use crate::{Artifact, ArtifactHead, ArtifactStore, StoreError, StoreResult};

/// In-memory artifact store for tests and development
#[derive(Default)]
pub struct MemoryStore {
    artifacts: Arc<RwLock<HashMap<String, Artifact>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.artifacts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ArtifactStore for MemoryStore {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> StoreResult<()> {
        let artifact = Artifact {
            key: key.to_string(),
            bytes,
            content_type: content_type.to_string(),
            created_at: Utc::now(),
        };
        self.artifacts.write().insert(key.to_string(), artifact);
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Artifact> {
        self.artifacts
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.artifacts.read().contains_key(key))
    }

    async fn head(&self, key: &str) -> StoreResult<ArtifactHead> {
        let artifacts = self.artifacts.read();
        let artifact = artifacts
            .get(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        Ok(ArtifactHead {
            key: artifact.key.clone(),
            size_bytes: artifact.bytes.len() as u64,
            content_type: artifact.content_type.clone(),
            created_at: artifact.created_at,
        })
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.artifacts.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_get_exists_delete_cycle() {
        let store = MemoryStore::new();
        let key = "reports/user-1/job-1.pdf";

        assert!(!store.exists(key).await.unwrap());

        store
            .put(key, Bytes::from_static(b"%PDF-1.4"), "application/pdf")
            .await
            .unwrap();
        assert!(store.exists(key).await.unwrap());

        let artifact = store.get(key).await.unwrap();
        assert_eq!(artifact.content_type, "application/pdf");
        assert_eq!(&artifact.bytes[..], b"%PDF-1.4");

        let head = store.head(key).await.unwrap();
        assert_eq!(head.size_bytes, 8);

        store.delete(key).await.unwrap();
        assert!(!store.exists(key).await.unwrap());
        assert!(store.get(key).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn overwrite_replaces_content() {
        let store = MemoryStore::new();
        let key = "reports/user-1/job-1.pdf";

        store
            .put(key, Bytes::from_static(b"first"), "application/pdf")
            .await
            .unwrap();
        store
            .put(key, Bytes::from_static(b"second"), "application/pdf")
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(&store.get(key).await.unwrap().bytes[..], b"second");
    }
}

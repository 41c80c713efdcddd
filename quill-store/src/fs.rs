use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::{Artifact, ArtifactHead, ArtifactStore, StoreError, StoreResult};

/// Sidecar metadata persisted next to each artifact's content file
#[derive(Debug, Serialize, Deserialize)]
struct SidecarMeta {
    content_type: String,
    created_at: DateTime<Utc>,
    size_bytes: u64,
}

/// Filesystem-backed artifact store.
///
/// Each artifact is a content file under the root directory plus a
/// `.meta.json` sidecar. Writes go to a temp file first and are renamed
/// into place, so a concurrent overwrite of the same key never exposes a
/// torn artifact.
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn content_path(&self, key: &str) -> StoreResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }

    fn meta_path(&self, key: &str) -> StoreResult<PathBuf> {
        let mut path = self.content_path(key)?.into_os_string();
        path.push(".meta.json");
        Ok(PathBuf::from(path))
    }
}

/// Keys are relative slash-separated paths; anything that could escape
/// the root is rejected before touching the filesystem.
fn validate_key(key: &str) -> StoreResult<()> {
    if key.is_empty() {
        return Err(StoreError::InvalidKey("empty key".to_string()));
    }
    let path = Path::new(key);
    for component in path.components() {
        match component {
            Component::Normal(_) => {}
            _ => return Err(StoreError::InvalidKey(key.to_string())),
        }
    }
    Ok(())
}

#[async_trait]
impl ArtifactStore for FsStore {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> StoreResult<()> {
        let content_path = self.content_path(key)?;
        let meta_path = self.meta_path(key)?;

        if let Some(parent) = content_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let meta = SidecarMeta {
            content_type: content_type.to_string(),
            created_at: Utc::now(),
            size_bytes: bytes.len() as u64,
        };
        let meta_bytes = serde_json::to_vec(&meta)
            .map_err(|e| StoreError::Metadata(e.to_string()))?;

        // Temp-then-rename keeps overwrites atomic on the same filesystem
        let tmp_suffix = uuid::Uuid::new_v4().to_string();
        let tmp_content = content_path.with_extension(format!("tmp-{}", tmp_suffix));
        let tmp_meta = meta_path.with_extension(format!("tmp-{}", tmp_suffix));

        fs::write(&tmp_content, &bytes).await?;
        fs::write(&tmp_meta, &meta_bytes).await?;
        fs::rename(&tmp_meta, &meta_path).await?;
        fs::rename(&tmp_content, &content_path).await?;

        debug!(key, size = bytes.len(), "artifact persisted");
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Artifact> {
        let content_path = self.content_path(key)?;
        let bytes = match fs::read(&content_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(key.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let head = self.head(key).await?;
        Ok(Artifact {
            key: key.to_string(),
            bytes: Bytes::from(bytes),
            content_type: head.content_type,
            created_at: head.created_at,
        })
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        let content_path = self.content_path(key)?;
        Ok(fs::try_exists(&content_path).await?)
    }

    async fn head(&self, key: &str) -> StoreResult<ArtifactHead> {
        let meta_path = self.meta_path(key)?;
        let meta_bytes = match fs::read(&meta_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(key.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        let meta: SidecarMeta = serde_json::from_slice(&meta_bytes)
            .map_err(|e| StoreError::Metadata(e.to_string()))?;

        Ok(ArtifactHead {
            key: key.to_string(),
            size_bytes: meta.size_bytes,
            content_type: meta.content_type,
            created_at: meta.created_at,
        })
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let content_path = self.content_path(key)?;
        let meta_path = self.meta_path(key)?;

        for path in [content_path, meta_path] {
            match fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_store() -> FsStore {
        let root = std::env::temp_dir()
            .join("quill-store-tests")
            .join(uuid::Uuid::new_v4().to_string());
        FsStore::new(root)
    }

    #[tokio::test]
    async fn put_get_roundtrip_with_metadata() {
        let store = scratch_store();
        let key = "reports/user-1/job-1.pdf";

        store
            .put(key, Bytes::from_static(b"%PDF-1.4 fake"), "application/pdf")
            .await
            .unwrap();

        let artifact = store.get(key).await.unwrap();
        assert_eq!(&artifact.bytes[..], b"%PDF-1.4 fake");
        assert_eq!(artifact.content_type, "application/pdf");

        let head = store.head(key).await.unwrap();
        assert_eq!(head.size_bytes, 13);
    }

    #[tokio::test]
    async fn exists_tracks_put_and_delete() {
        let store = scratch_store();
        let key = "reports/user-1/job-2.pdf";

        assert!(!store.exists(key).await.unwrap());
        store
            .put(key, Bytes::from_static(b"x"), "application/pdf")
            .await
            .unwrap();
        assert!(store.exists(key).await.unwrap());

        store.delete(key).await.unwrap();
        assert!(!store.exists(key).await.unwrap());

        // Deleting again is a no-op
        store.delete(key).await.unwrap();
    }

    #[tokio::test]
    async fn overwrite_converges_to_latest_content() {
        let store = scratch_store();
        let key = "reports/user-1/job-3.pdf";

        store
            .put(key, Bytes::from_static(b"first"), "application/pdf")
            .await
            .unwrap();
        store
            .put(key, Bytes::from_static(b"second"), "application/pdf")
            .await
            .unwrap();

        assert_eq!(&store.get(key).await.unwrap().bytes[..], b"second");
    }

    #[tokio::test]
    async fn traversal_keys_are_rejected() {
        let store = scratch_store();

        let result = store.exists("../outside").await;
        assert!(matches!(result, Err(StoreError::InvalidKey(_))));

        let result = store
            .put("/absolute", Bytes::from_static(b"x"), "application/pdf")
            .await;
        assert!(matches!(result, Err(StoreError::InvalidKey(_))));
    }
}

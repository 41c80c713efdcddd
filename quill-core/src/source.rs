use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{SourceError, SourceResult};
use crate::ids::OwnerId;
use crate::record::TaskRecord;

/// Read-only provider of the records belonging to an owner.
///
/// Workers read through this seam exactly once per job, at render start;
/// the snapshot is never written back. An empty result set is a valid
/// answer, not an error.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Bulk-fetch every record owned by `owner_id`
    async fn records_for(&self, owner_id: &OwnerId) -> SourceResult<Vec<TaskRecord>>;
}

/// In-memory record source for tests and single-process deployments
#[derive(Default)]
pub struct InMemoryRecordSource {
    records: Arc<RwLock<HashMap<OwnerId, Vec<TaskRecord>>>>,
}

impl InMemoryRecordSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed records for an owner, replacing any previous seed
    pub fn seed(&self, owner_id: OwnerId, records: Vec<TaskRecord>) {
        self.records.write().insert(owner_id, records);
    }

    /// Append a single record
    pub fn push(&self, record: TaskRecord) {
        self.records
            .write()
            .entry(record.owner_id.clone())
            .or_default()
            .push(record);
    }
}

#[async_trait]
impl RecordSource for InMemoryRecordSource {
    async fn records_for(&self, owner_id: &OwnerId) -> SourceResult<Vec<TaskRecord>> {
        Ok(self
            .records
            .read()
            .get(owner_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// Record source that fails every read; lets tests drive the redelivery
/// and dead-letter paths
pub struct FailingRecordSource {
    message: String,
}

impl FailingRecordSource {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl RecordSource for FailingRecordSource {
    async fn records_for(&self, _owner_id: &OwnerId) -> SourceResult<Vec<TaskRecord>> {
        Err(SourceError::Unavailable(self.message.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_owner_yields_empty_set() {
        let source = InMemoryRecordSource::new();
        let records = source.records_for(&OwnerId::new("nobody")).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn seeded_records_come_back_for_their_owner_only() {
        let source = InMemoryRecordSource::new();
        let owner = OwnerId::new("user-1");
        source.seed(owner.clone(), vec![TaskRecord::new(owner.clone(), "a")]);
        source.push(TaskRecord::new(owner.clone(), "b"));

        assert_eq!(source.records_for(&owner).await.unwrap().len(), 2);
        assert!(source
            .records_for(&OwnerId::new("user-2"))
            .await
            .unwrap()
            .is_empty());
    }
}

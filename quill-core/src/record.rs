use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::OwnerId;

/// Workflow state of a task record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    #[serde(alias = "inprogress")]
    InProgress,
    #[serde(alias = "completed")]
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Priority of a task record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// One business record read as render input.
///
/// Records are owned by the external record service; the pipeline only
/// ever reads them, and only in bulk per owner at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub owner_id: OwnerId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    /// Absent on records that predate creation tracking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl TaskRecord {
    pub fn new(owner_id: OwnerId, title: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id,
            title: title.into(),
            description: None,
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            created_at: Some(Utc::now()),
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_accepts_loose_wire_spellings() {
        let done: TaskStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(done, TaskStatus::Done);

        let in_progress: TaskStatus = serde_json::from_str("\"inprogress\"").unwrap();
        assert_eq!(in_progress, TaskStatus::InProgress);

        let canonical: TaskStatus = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(canonical, TaskStatus::InProgress);
    }

    #[test]
    fn record_defaults_missing_fields() {
        let record: TaskRecord = serde_json::from_str(
            r#"{"id":"t1","owner_id":"user-1","title":"write docs"}"#,
        )
        .unwrap();

        assert_eq!(record.status, TaskStatus::Todo);
        assert_eq!(record.priority, TaskPriority::Medium);
        assert!(record.created_at.is_none());
    }
}

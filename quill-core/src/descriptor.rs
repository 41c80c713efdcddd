use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::ids::{JobId, OwnerId};

/// The kind of report a job produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportKind {
    /// Summary of an owner's tasks: statistics, analytics, bounded listing
    #[serde(rename = "task-summary")]
    TaskSummary,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TaskSummary => "task-summary",
        }
    }
}

impl Default for ReportKind {
    fn default() -> Self {
        Self::TaskSummary
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "task-summary" => Ok(Self::TaskSummary),
            other => Err(DomainError::UnknownReportKind(other.to_string())),
        }
    }
}

/// Immutable description of one report job.
///
/// Created once at submission, serialized as the queue message body, and
/// never mutated afterwards. Job state is not stored here: progress is
/// inferred from artifact existence, and retry bookkeeping belongs to the
/// queue's delivery metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescriptor {
    /// Unique job identifier, minted at submission
    pub job_id: JobId,

    /// Principal whose records are summarized
    pub owner_id: OwnerId,

    /// What to render
    pub report_kind: ReportKind,

    /// When the job was accepted
    pub submitted_at: DateTime<Utc>,

    /// Opaque metadata (request origin, correlation ids)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, String>,
}

impl JobDescriptor {
    /// Mint a descriptor for a new submission
    pub fn new(owner_id: OwnerId, report_kind: ReportKind) -> Self {
        Self {
            job_id: JobId::new(),
            owner_id,
            report_kind,
            submitted_at: Utc::now(),
            context: BTreeMap::new(),
        }
    }

    /// Attach a context entry
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_roundtrips_through_json() {
        let descriptor = JobDescriptor::new(OwnerId::new("user-1"), ReportKind::TaskSummary)
            .with_context("origin", "api");

        let bytes = serde_json::to_vec(&descriptor).unwrap();
        let decoded: JobDescriptor = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(decoded, descriptor);
        assert_eq!(decoded.context.get("origin").map(String::as_str), Some("api"));
    }

    #[test]
    fn report_kind_parses_wire_tag() {
        assert_eq!("task-summary".parse::<ReportKind>().unwrap(), ReportKind::TaskSummary);
        assert!(matches!(
            "quarterly-forecast".parse::<ReportKind>(),
            Err(DomainError::UnknownReportKind(_))
        ));
    }
}

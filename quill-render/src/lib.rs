//! # quill-render: CPU-bound report generation
//!
//! Pure transformation from an owner's record snapshot to PDF bytes.
//! Deterministic for a fixed input set — the only non-reproducible output
//! is the explicitly stamped generation timestamp — and strictly
//! read-only over its inputs, which is what keeps at-least-once
//! redelivery safe upstream.
//!
//! The computed aggregates (counts, ages, productivity and distribution
//! scores) are the contract; the visual layout is an implementation
//! detail beyond "valid PDF containing the aggregates and the bounded
//! listing". Rendering runs synchronously inside the worker's
//! message-processing unit of work: it must not be offloaded somewhere
//! that could outlive the message lease it is processing under.

pub mod analytics;
pub mod error;
pub mod stats;

mod pdf;

use chrono::{DateTime, Utc};
use quill_core::{JobDescriptor, TaskRecord};
use tracing::{debug, info};

pub use analytics::{insights, recommendations, Analytics, Recommendation, WorkloadStatus};
pub use error::{RenderError, RenderResult};
pub use pdf::MAX_LISTED_RECORDS;
pub use stats::{ReportStats, TimingAnalysis};

/// Content type of every artifact this renderer produces
pub const CONTENT_TYPE_PDF: &str = "application/pdf";

/// A finished artifact ready for persistence
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

/// The report renderer. Stateless; cheap to clone into every worker.
#[derive(Debug, Clone, Default)]
pub struct ReportRenderer;

impl ReportRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render a report for `descriptor` over a snapshot of `records`
    pub fn render(
        &self,
        descriptor: &JobDescriptor,
        records: &[TaskRecord],
    ) -> RenderResult<RenderedReport> {
        self.render_at(descriptor, records, Utc::now())
    }

    /// Render with an explicit clock, for reproducible tests
    pub fn render_at(
        &self,
        descriptor: &JobDescriptor,
        records: &[TaskRecord],
        now: DateTime<Utc>,
    ) -> RenderResult<RenderedReport> {
        let started = std::time::Instant::now();

        let stats = ReportStats::compute(records);
        let timing = TimingAnalysis::compute(records, now);
        let analytics = Analytics::compute(&stats, &timing);
        debug!(
            total = stats.total,
            completed = stats.completed,
            productivity = analytics.productivity_score,
            "aggregates computed"
        );

        let bytes = pdf::render_document(descriptor, records, &stats, &timing, &analytics, now)?;

        info!(
            job_id = %descriptor.job_id,
            records = records.len(),
            size_bytes = bytes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "report rendered"
        );

        Ok(RenderedReport {
            bytes,
            content_type: CONTENT_TYPE_PDF,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::{OwnerId, ReportKind, TaskPriority, TaskStatus};

    fn descriptor() -> JobDescriptor {
        JobDescriptor::new(OwnerId::new("user-1"), ReportKind::TaskSummary)
    }

    fn record(status: TaskStatus, priority: TaskPriority) -> TaskRecord {
        TaskRecord::new(OwnerId::new("user-1"), "a task")
            .with_status(status)
            .with_priority(priority)
            .with_description("a description of the work")
    }

    #[test]
    fn empty_record_set_renders_a_valid_minimal_pdf() {
        let report = ReportRenderer::new().render(&descriptor(), &[]).unwrap();

        assert!(report.bytes.starts_with(b"%PDF"));
        assert!(report.bytes.len() > 500);
        assert_eq!(report.content_type, CONTENT_TYPE_PDF);
    }

    #[test]
    fn mixed_record_set_renders() {
        let records = vec![
            record(TaskStatus::Done, TaskPriority::High),
            record(TaskStatus::InProgress, TaskPriority::Medium),
            record(TaskStatus::Todo, TaskPriority::Low),
        ];

        let report = ReportRenderer::new().render(&descriptor(), &records).unwrap();
        assert!(report.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn listing_stays_bounded_for_large_inputs() {
        let records: Vec<TaskRecord> = (0..MAX_LISTED_RECORDS + 25)
            .map(|_| record(TaskStatus::Todo, TaskPriority::Medium))
            .collect();

        // Must not blow up or grow unboundedly; the listing caps at
        // MAX_LISTED_RECORDS entries plus the "more not shown" footer.
        let report = ReportRenderer::new().render(&descriptor(), &records).unwrap();
        assert!(report.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn aggregates_are_deterministic_for_identical_inputs() {
        let records = vec![
            record(TaskStatus::Done, TaskPriority::High),
            record(TaskStatus::Todo, TaskPriority::Low),
        ];
        let now = Utc::now();

        let first = ReportStats::compute(&records);
        let second = ReportStats::compute(&records);
        assert_eq!(first, second);

        let timing_a = TimingAnalysis::compute(&records, now);
        let timing_b = TimingAnalysis::compute(&records, now);
        assert_eq!(timing_a, timing_b);

        assert_eq!(
            Analytics::compute(&first, &timing_a),
            Analytics::compute(&second, &timing_b)
        );
    }
}

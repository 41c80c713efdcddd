use chrono::{DateTime, Duration, Utc};
use quill_core::{TaskPriority, TaskRecord, TaskStatus};
use serde::Serialize;

/// Aggregate counts over an owner's records
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub todo: usize,
    pub high_priority: usize,
    pub medium_priority: usize,
    pub low_priority: usize,
}

impl ReportStats {
    pub fn compute(records: &[TaskRecord]) -> Self {
        let mut stats = Self {
            total: records.len(),
            ..Self::default()
        };

        for record in records {
            match record.status {
                TaskStatus::Done => stats.completed += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Todo => stats.todo += 1,
            }
            match record.priority {
                TaskPriority::High => stats.high_priority += 1,
                TaskPriority::Medium => stats.medium_priority += 1,
                TaskPriority::Low => stats.low_priority += 1,
            }
        }

        stats
    }

    /// Completed share of all records, 0.0 for an empty set
    pub fn completion_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    pub fn remaining(&self) -> usize {
        self.total - self.completed
    }
}

/// Age distribution of records relative to render time.
///
/// Only records carrying a creation timestamp participate; ages are whole
/// days, clamped at zero for clock skew.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimingAnalysis {
    pub avg_age_days: f64,
    pub oldest_age_days: i64,
    pub newest_age_days: i64,
    pub created_this_week: usize,
    pub created_this_month: usize,
}

impl TimingAnalysis {
    pub fn compute(records: &[TaskRecord], now: DateTime<Utc>) -> Self {
        let week_ago = now - Duration::days(7);
        let month_ago = now - Duration::days(30);

        let mut total_age: i64 = 0;
        let mut dated: usize = 0;
        let mut oldest: i64 = 0;
        let mut newest: Option<i64> = None;
        let mut this_week = 0;
        let mut this_month = 0;

        for record in records {
            let Some(created_at) = record.created_at else {
                continue;
            };
            let age = (now - created_at).num_days().max(0);

            total_age += age;
            dated += 1;
            oldest = oldest.max(age);
            newest = Some(newest.map_or(age, |n: i64| n.min(age)));

            if created_at >= week_ago {
                this_week += 1;
            }
            if created_at >= month_ago {
                this_month += 1;
            }
        }

        Self {
            avg_age_days: if dated > 0 {
                total_age as f64 / dated as f64
            } else {
                0.0
            },
            oldest_age_days: oldest,
            newest_age_days: newest.unwrap_or(0),
            created_this_week: this_week,
            created_this_month: this_month,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::OwnerId;

    fn record(status: TaskStatus, priority: TaskPriority) -> TaskRecord {
        TaskRecord::new(OwnerId::new("user-1"), "task")
            .with_status(status)
            .with_priority(priority)
    }

    #[test]
    fn counts_by_status_and_priority() {
        let records = vec![
            record(TaskStatus::Done, TaskPriority::High),
            record(TaskStatus::InProgress, TaskPriority::Medium),
            record(TaskStatus::Todo, TaskPriority::Low),
        ];

        let stats = ReportStats::compute(&records);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.todo, 1);
        assert_eq!(stats.high_priority, 1);
        assert_eq!(stats.medium_priority, 1);
        assert_eq!(stats.low_priority, 1);
        assert!((stats.completion_ratio() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn empty_set_yields_zeroes_without_division_errors() {
        let stats = ReportStats::compute(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.completion_ratio(), 0.0);
        assert_eq!(stats.remaining(), 0);

        let timing = TimingAnalysis::compute(&[], Utc::now());
        assert_eq!(timing.avg_age_days, 0.0);
        assert_eq!(timing.newest_age_days, 0);
    }

    #[test]
    fn ages_are_relative_to_render_time() {
        let now = Utc::now();
        let owner = OwnerId::new("user-1");
        let records = vec![
            TaskRecord::new(owner.clone(), "old").with_created_at(now - Duration::days(10)),
            TaskRecord::new(owner.clone(), "recent").with_created_at(now - Duration::days(2)),
            // Undated records do not participate in the age distribution
            TaskRecord {
                created_at: None,
                ..TaskRecord::new(owner, "undated")
            },
        ];

        let timing = TimingAnalysis::compute(&records, now);
        assert_eq!(timing.oldest_age_days, 10);
        assert_eq!(timing.newest_age_days, 2);
        assert!((timing.avg_age_days - 6.0).abs() < 1e-9);
        assert_eq!(timing.created_this_week, 1);
        assert_eq!(timing.created_this_month, 2);
    }
}

use serde::Serialize;

use crate::stats::{ReportStats, TimingAnalysis};

/// Coarse workload classification from the high-priority share
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadStatus {
    Light,
    Balanced,
    Overloaded,
}

impl WorkloadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Balanced => "balanced",
            Self::Overloaded => "overloaded",
        }
    }
}

/// Derived scores over the aggregates. The formulas are contract:
///
/// - `productivity_score = completed / total × 100` (0 when total is 0)
/// - `distribution_score = max(0, 10 − 30 × |1/3 − high/total|)`
///   (0 when total is 0); 1/3 is the target high-priority share
/// - `velocity = completed / avg_age_days`, falling back to `completed`
///   when the average age is 0
/// - `estimated_completion_days = ceil(remaining / velocity)` (0 when
///   velocity is 0)
/// - `recommended_daily = max(1, ceil(remaining / 30))`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analytics {
    pub productivity_score: f64,
    pub velocity: f64,
    pub estimated_completion_days: u64,
    pub workload: WorkloadStatus,
    pub distribution_score: f64,
    pub recommended_daily: u64,
}

impl Analytics {
    pub fn compute(stats: &ReportStats, timing: &TimingAnalysis) -> Self {
        let total = stats.total as f64;
        let completed = stats.completed as f64;
        let high = stats.high_priority as f64;
        let remaining = stats.remaining() as f64;

        let productivity_score = stats.completion_ratio() * 100.0;

        let velocity = if timing.avg_age_days > 0.0 {
            completed / timing.avg_age_days
        } else {
            completed
        };

        let estimated_completion_days = if velocity > 0.0 {
            (remaining / velocity).ceil() as u64
        } else {
            0
        };

        let workload = if high > total * 0.5 {
            WorkloadStatus::Overloaded
        } else if high < total * 0.2 {
            WorkloadStatus::Light
        } else {
            WorkloadStatus::Balanced
        };

        let distribution_score = if stats.total == 0 {
            0.0
        } else {
            (10.0 - (1.0 / 3.0 - high / total).abs() * 30.0).max(0.0)
        };

        let recommended_daily = ((remaining / 30.0).ceil() as u64).max(1);

        Self {
            productivity_score,
            velocity,
            estimated_completion_days,
            workload,
            distribution_score,
            recommended_daily,
        }
    }
}

/// Narrative observations for the executive summary
pub fn insights(stats: &ReportStats, analytics: &Analytics) -> Vec<String> {
    let mut insights = Vec::new();
    let completion_rate = stats.completion_ratio() * 100.0;

    if completion_rate >= 75.0 {
        insights.push(
            "Excellent completion rate! You're staying on top of your tasks effectively."
                .to_string(),
        );
    } else if completion_rate >= 50.0 {
        insights.push(
            "Good progress on tasks, but there's room for improvement in completion rates."
                .to_string(),
        );
    } else {
        insights.push(
            "Consider focusing on completing existing tasks before adding new ones.".to_string(),
        );
    }

    if stats.high_priority as f64 > stats.total as f64 * 0.4 {
        insights.push(format!(
            "{} high-priority tasks require immediate attention.",
            stats.high_priority
        ));
    }

    if stats.in_progress as f64 > stats.total as f64 * 0.5 {
        insights.push(
            "Many tasks are in progress. Focus on completing them before starting new ones."
                .to_string(),
        );
    }

    if analytics.velocity > 0.0 {
        insights.push(format!(
            "At your current pace, you complete approximately {:.1} tasks per day.",
            analytics.velocity
        ));
    }

    insights
}

/// An actionable recommendation derived from the aggregates
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub title: &'static str,
    pub description: String,
    pub priority: &'static str,
    pub impact: &'static str,
}

pub fn recommendations(stats: &ReportStats) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    if stats.high_priority > 5 {
        recs.push(Recommendation {
            title: "Focus on High-Priority Tasks",
            description: format!(
                "You have {} high-priority tasks. Consider dedicating focused time blocks to \
                 tackle these first, as they likely have the most significant impact on your goals.",
                stats.high_priority
            ),
            priority: "High",
            impact: "High",
        });
    }

    if stats.in_progress > stats.completed {
        recs.push(Recommendation {
            title: "Complete In-Progress Tasks",
            description: "You have more tasks in progress than completed. Try to finish existing \
                          tasks before starting new ones to maintain momentum and reduce context \
                          switching."
                .to_string(),
            priority: "Medium",
            impact: "High",
        });
    }

    if stats.todo > 20 {
        recs.push(Recommendation {
            title: "Review and Prioritize Backlog",
            description: format!(
                "With {} tasks in your backlog, consider reviewing and prioritizing them. Some \
                 may no longer be relevant or could be delegated.",
                stats.todo
            ),
            priority: "Medium",
            impact: "Medium",
        });
    }

    recs.push(Recommendation {
        title: "Set Daily Goals",
        description: "Establish a daily goal for task completion. Even completing 2-3 important \
                      tasks per day can significantly improve your productivity over time."
            .to_string(),
        priority: "Low",
        impact: "High",
    });

    recs.push(Recommendation {
        title: "Regular Reviews",
        description: "Schedule weekly reviews of your task list to ensure priorities are \
                      up-to-date and remove obsolete tasks."
            .to_string(),
        priority: "Low",
        impact: "Medium",
    });

    recs
}

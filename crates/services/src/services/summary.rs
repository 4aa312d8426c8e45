//! Task summary aggregation over a selectable date window.
//!
//! Recomputed from the full task list on every call; nothing is cached.

use chrono::NaiveDate;
use db::models::task::{Task, TaskPriority};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Supported window sizes, in days.
pub const SUMMARY_WINDOWS: [u32; 3] = [1, 3, 7];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct PendingByPriority {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub urgent: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    pub window_days: u32,
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub pending_by_priority: PendingByPriority,
    /// completed / total; exactly 0.0 when total is 0.
    pub completion_rate: f64,
}

/// Aggregate counts for tasks whose due date lies within `window_days` of
/// `today` (either direction).
pub fn summarize(tasks: &[Task], window_days: u32, today: NaiveDate) -> TaskSummary {
    let in_window = |task: &&Task| {
        let delta = (task.due_date - today).num_days().unsigned_abs();
        delta <= u64::from(window_days)
    };

    let window: Vec<&Task> = tasks.iter().filter(in_window).collect();

    let total = window.len();
    let completed = window.iter().filter(|t| t.status).count();
    let pending = total - completed;

    let mut by_priority = PendingByPriority::default();
    for task in window.iter().filter(|t| !t.status) {
        match task.priority {
            TaskPriority::Low => by_priority.low += 1,
            TaskPriority::Medium => by_priority.medium += 1,
            TaskPriority::High => by_priority.high += 1,
            TaskPriority::Urgent => by_priority.urgent += 1,
        }
    }

    let completion_rate = if total > 0 {
        completed as f64 / total as f64
    } else {
        0.0
    };

    TaskSummary {
        window_days,
        total,
        completed,
        pending,
        pending_by_priority: by_priority,
        completion_rate,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn task(id: i64, priority: TaskPriority, status: bool, due: NaiveDate) -> Task {
        Task {
            id,
            name: format!("task {id}"),
            description: String::new(),
            due_date: due,
            status,
            priority,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
    }

    #[test]
    fn empty_task_list_yields_zero_rate_not_nan() {
        let summary = summarize(&[], 7, day(24));
        assert_eq!(summary.total, 0);
        assert_eq!(summary.completion_rate, 0.0);
        assert!(!summary.completion_rate.is_nan());
    }

    #[test]
    fn counts_and_rate_within_window() {
        let today = day(24);
        let tasks = vec![
            task(1, TaskPriority::Urgent, false, day(24)),
            task(2, TaskPriority::Low, true, day(23)),
            task(3, TaskPriority::Medium, false, day(25)),
            // Outside a 1-day window:
            task(4, TaskPriority::High, false, day(31)),
        ];
        let summary = summarize(&tasks, 1, today);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.pending, 2);
        assert_eq!(summary.pending_by_priority.urgent, 1);
        assert_eq!(summary.pending_by_priority.medium, 1);
        assert_eq!(summary.pending_by_priority.high, 0);
        assert!((summary.completion_rate - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn wider_window_sees_more_tasks() {
        let today = day(24);
        let tasks = vec![
            task(1, TaskPriority::Medium, false, day(24)),
            task(2, TaskPriority::Medium, false, day(31)),
        ];
        assert_eq!(summarize(&tasks, 1, today).total, 1);
        assert_eq!(summarize(&tasks, 7, today).total, 2);
    }
}

//! Heuristic task ordering: priority rank first, earlier due date second.

use db::models::task::Task;

/// Pending tasks ordered by priority rank descending, then due date
/// ascending. Relative order of ties is unspecified.
pub fn sort_pending(tasks: &[Task]) -> Vec<Task> {
    let mut pending: Vec<Task> = tasks.iter().filter(|t| !t.status).cloned().collect();
    pending.sort_by(|a, b| {
        b.priority
            .rank()
            .cmp(&a.priority.rank())
            .then(a.due_date.cmp(&b.due_date))
    });
    pending
}

/// The single task to work on next (rank-1 element of the ordering).
pub fn focus_candidate(tasks: &[Task]) -> Option<Task> {
    sort_pending(tasks).into_iter().next()
}

/// Ids of the tasks most likely to be worked on next week: open, highest
/// priority, earliest due; capped at five.
pub fn predicted_task_ids(tasks: &[Task]) -> Vec<i64> {
    sort_pending(tasks).into_iter().take(5).map(|t| t.id).collect()
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use db::models::task::TaskPriority;

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
    fn urgent_sorts_before_overdue_low() {
        // Urgent due today beats low overdue by a day.
        let tasks = vec![
            task(1, TaskPriority::Urgent, false, day(24)),
            task(2, TaskPriority::Low, false, day(23)),
        ];
        let ordered = sort_pending(&tasks);
        let ids: Vec<i64> = ordered.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn rank_non_increasing_and_due_non_decreasing_within_rank() {
        let tasks = vec![
            task(1, TaskPriority::Medium, false, day(28)),
            task(2, TaskPriority::High, false, day(30)),
            task(3, TaskPriority::Medium, false, day(25)),
            task(4, TaskPriority::Urgent, false, day(29)),
            task(5, TaskPriority::High, false, day(26)),
        ];
        let ordered = sort_pending(&tasks);
        for pair in ordered.windows(2) {
            assert!(pair[0].priority.rank() >= pair[1].priority.rank());
            if pair[0].priority.rank() == pair[1].priority.rank() {
                assert!(pair[0].due_date <= pair[1].due_date);
            }
        }
    }

    #[test]
    fn completed_tasks_are_excluded() {
        let tasks = vec![
            task(1, TaskPriority::Urgent, true, day(24)),
            task(2, TaskPriority::Low, false, day(24)),
        ];
        let ordered = sort_pending(&tasks);
        assert_eq!(ordered.len(), 1);
        assert_eq!(ordered[0].id, 2);
    }

    #[test]
    fn focus_candidate_is_first_of_ordering() {
        let tasks = vec![
            task(1, TaskPriority::Medium, false, day(24)),
            task(2, TaskPriority::Urgent, false, day(26)),
        ];
        assert_eq!(focus_candidate(&tasks).map(|t| t.id), Some(2));
        assert!(focus_candidate(&[]).is_none());
    }

    #[test]
    fn predicted_ids_capped_at_five() {
        let tasks: Vec<Task> = (1..=8)
            .map(|id| task(id, TaskPriority::Medium, false, day(24)))
            .collect();
        assert_eq!(predicted_task_ids(&tasks).len(), 5);
    }
}

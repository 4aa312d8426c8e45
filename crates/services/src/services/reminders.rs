//! Priority-driven task reminders.
//!
//! In-memory and best-effort: reminder state does not survive a restart.
//! A background loop polls the task table and fires a reminder whenever a
//! pending task's cadence interval has elapsed. Urgent and high priority
//! repeat every 30 minutes (urgent also fires immediately), medium every two
//! hours, low never.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use db::{
    DBService,
    models::task::{Task, TaskPriority},
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio::time::interval;
use tracing::{debug, error, info, warn};
use ts_rs::TS;
use uuid::Uuid;

/// Reminder repeat interval for a task priority; None means no reminders.
pub fn cadence(priority: TaskPriority) -> Option<Duration> {
    match priority {
        TaskPriority::Urgent | TaskPriority::High => Some(Duration::from_secs(30 * 60)),
        TaskPriority::Medium => Some(Duration::from_secs(2 * 60 * 60)),
        TaskPriority::Low => None,
    }
}

/// Human-readable urgency line for a task reminder.
pub fn urgency_message(task: &Task, today: NaiveDate) -> String {
    let days_until_due = (task.due_date - today).num_days();
    let urgency = if days_until_due < 0 {
        "OVERDUE!".to_string()
    } else if days_until_due == 0 {
        "Due today!".to_string()
    } else if days_until_due == 1 {
        "Due tomorrow!".to_string()
    } else {
        format!("Due in {days_until_due} days")
    };

    let description = if task.description.trim().is_empty() {
        "No description provided."
    } else {
        task.description.as_str()
    };

    format!(
        "{urgency} Priority: {}. {description}",
        task.priority.to_string().to_uppercase()
    )
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct TaskNotification {
    pub id: Uuid,
    pub task_id: i64,
    pub task_name: String,
    pub priority: TaskPriority,
    pub due_date: NaiveDate,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct PriorityCounts {
    pub urgent: usize,
    pub high: usize,
    pub medium: usize,
    pub total: usize,
}

/// In-memory notification list shared between the reminder loop and the API.
#[derive(Clone, Default)]
pub struct NotificationLog {
    entries: Arc<RwLock<Vec<TaskNotification>>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Newest first.
    pub async fn push(&self, notification: TaskNotification) {
        self.entries.write().await.insert(0, notification);
    }

    pub async fn list(&self) -> Vec<TaskNotification> {
        self.entries.read().await.clone()
    }

    pub async fn unread_count(&self) -> usize {
        self.entries.read().await.iter().filter(|n| !n.is_read).count()
    }

    pub async fn priority_counts(&self) -> PriorityCounts {
        let entries = self.entries.read().await;
        let mut counts = PriorityCounts::default();
        for n in entries.iter().filter(|n| !n.is_read) {
            match n.priority {
                TaskPriority::Urgent => counts.urgent += 1,
                TaskPriority::High => counts.high += 1,
                TaskPriority::Medium => counts.medium += 1,
                TaskPriority::Low => {}
            }
            counts.total += 1;
        }
        counts
    }

    pub async fn mark_read(&self, id: Uuid) -> bool {
        let mut entries = self.entries.write().await;
        match entries.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.is_read = true;
                true
            }
            None => false,
        }
    }

    pub async fn mark_all_read(&self) {
        for n in self.entries.write().await.iter_mut() {
            n.is_read = true;
        }
    }

    pub async fn dismiss(&self, id: Uuid) -> bool {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|n| n.id != id);
        entries.len() != before
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

/// Background service firing priority-based reminders for pending tasks.
#[derive(Clone)]
pub struct ReminderService {
    db: DBService,
    log: NotificationLog,
    enabled: Arc<AtomicBool>,
    last_fired: Arc<DashMap<i64, DateTime<Utc>>>,
    poll_interval: Duration,
}

impl ReminderService {
    pub fn new(db: DBService) -> Self {
        Self {
            db,
            log: NotificationLog::new(),
            enabled: Arc::new(AtomicBool::new(true)),
            last_fired: Arc::new(DashMap::new()),
            poll_interval: Duration::from_secs(60),
        }
    }

    pub fn log(&self) -> &NotificationLog {
        &self.log
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Relaxed);
    }

    /// Disabling also forgets interval state, so re-enabling starts each
    /// task's cadence from scratch.
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Relaxed);
        self.last_fired.clear();
    }

    /// Spawn the background reminder loop.
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.start().await;
        })
    }

    async fn start(&self) {
        info!(
            "Starting reminder service with poll interval {:?}",
            self.poll_interval
        );

        let mut interval = interval(self.poll_interval);
        loop {
            interval.tick().await;
            if !self.is_enabled() {
                continue;
            }
            if let Err(e) = self.check_tasks().await {
                error!("Error checking tasks for reminders: {}", e);
            }
        }
    }

    async fn check_tasks(&self) -> Result<(), sqlx::Error> {
        let tasks = Task::find_all(&self.db.pool).await?;
        let now = Utc::now();
        let today = now.date_naive();

        // Forget tasks that were completed, deleted, or downgraded to low.
        self.last_fired.retain(|id, _| {
            tasks
                .iter()
                .any(|t| t.id == *id && !t.status && cadence(t.priority).is_some())
        });

        for task in tasks.iter().filter(|t| !t.status) {
            let Some(every) = cadence(task.priority) else {
                continue;
            };
            let every = chrono::Duration::seconds(every.as_secs() as i64);

            match self.last_fired.get(&task.id).map(|e| *e.value()) {
                None => {
                    // First observation starts the interval; urgent tasks get
                    // an immediate reminder.
                    self.last_fired.insert(task.id, now);
                    if task.priority == TaskPriority::Urgent {
                        self.fire(task, today, now).await;
                    }
                }
                Some(last) => {
                    if now - last >= every {
                        self.last_fired.insert(task.id, now);
                        self.fire(task, today, now).await;
                    }
                }
            }
        }

        Ok(())
    }

    async fn fire(&self, task: &Task, today: NaiveDate, now: DateTime<Utc>) {
        let message = urgency_message(task, today);

        debug!(task_id = task.id, priority = %task.priority, "firing reminder");

        self.log
            .push(TaskNotification {
                id: Uuid::new_v4(),
                task_id: task.id,
                task_name: task.name.clone(),
                priority: task.priority,
                due_date: task.due_date,
                message: message.clone(),
                timestamp: now,
                is_read: false,
            })
            .await;

        // Desktop notification is best effort.
        if let Err(e) = notify_rust::Notification::new()
            .summary(&format!("Task Reminder: {}", task.name))
            .body(&message)
            .show()
        {
            warn!(task_id = task.id, error = %e, "desktop notification failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(priority: TaskPriority, due: NaiveDate, description: &str) -> Task {
        Task {
            id: 2,
            name: "pay bills".into(),
            description: description.into(),
            due_date: due,
            status: false,
            priority,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
    }

    #[test]
    fn cadence_by_priority() {
        assert_eq!(
            cadence(TaskPriority::Urgent),
            Some(Duration::from_secs(1800))
        );
        assert_eq!(cadence(TaskPriority::High), Some(Duration::from_secs(1800)));
        assert_eq!(
            cadence(TaskPriority::Medium),
            Some(Duration::from_secs(7200))
        );
        assert_eq!(cadence(TaskPriority::Low), None);
    }

    #[test]
    fn overdue_message() {
        let t = task(TaskPriority::Low, day(23), "electricity");
        assert_eq!(
            urgency_message(&t, day(24)),
            "OVERDUE! Priority: LOW. electricity"
        );
    }

    #[test]
    fn due_today_and_tomorrow_messages() {
        let t = task(TaskPriority::Urgent, day(24), "");
        assert_eq!(
            urgency_message(&t, day(24)),
            "Due today! Priority: URGENT. No description provided."
        );
        let t = task(TaskPriority::High, day(25), "x");
        assert_eq!(urgency_message(&t, day(24)), "Due tomorrow! Priority: HIGH. x");
    }

    #[test]
    fn due_in_n_days_message() {
        let t = task(TaskPriority::Medium, day(29), "x");
        assert_eq!(urgency_message(&t, day(24)), "Due in 5 days Priority: MEDIUM. x");
    }

    #[tokio::test]
    async fn log_read_and_dismiss_flow() {
        let log = NotificationLog::new();
        let id = Uuid::new_v4();
        log.push(TaskNotification {
            id,
            task_id: 1,
            task_name: "t".into(),
            priority: TaskPriority::Urgent,
            due_date: day(24),
            message: "m".into(),
            timestamp: Utc::now(),
            is_read: false,
        })
        .await;

        assert_eq!(log.unread_count().await, 1);
        assert_eq!(log.priority_counts().await.urgent, 1);

        assert!(log.mark_read(id).await);
        assert_eq!(log.unread_count().await, 0);
        assert!(!log.mark_read(Uuid::new_v4()).await);

        assert!(log.dismiss(id).await);
        assert!(log.list().await.is_empty());
    }

    #[tokio::test]
    async fn clear_empties_log() {
        let log = NotificationLog::new();
        for _ in 0..3 {
            log.push(TaskNotification {
                id: Uuid::new_v4(),
                task_id: 1,
                task_name: "t".into(),
                priority: TaskPriority::Medium,
                due_date: day(24),
                message: "m".into(),
                timestamp: Utc::now(),
                is_read: false,
            })
            .await;
        }
        log.mark_all_read().await;
        assert_eq!(log.unread_count().await, 0);
        log.clear().await;
        assert!(log.list().await.is_empty());
    }
}

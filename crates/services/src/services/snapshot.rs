//! Last-known-good task snapshot, used when the database is unreachable.
//!
//! The store is an injected interface so tests and alternate frontends can
//! substitute their own implementation. Snapshots expire after one hour.

use std::sync::RwLock;
use std::time::{Duration, Instant};

use db::models::task::Task;

pub const SNAPSHOT_MAX_AGE: Duration = Duration::from_secs(60 * 60);

pub trait SnapshotStore: Send + Sync {
    fn put(&self, tasks: Vec<Task>);
    /// The stored snapshot, or None when absent or older than the max age.
    fn get(&self) -> Option<Vec<Task>>;
    fn clear(&self);
}

pub struct InMemorySnapshotStore {
    inner: RwLock<Option<(Instant, Vec<Task>)>>,
    max_age: Duration,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::with_max_age(SNAPSHOT_MAX_AGE)
    }

    pub fn with_max_age(max_age: Duration) -> Self {
        Self {
            inner: RwLock::new(None),
            max_age,
        }
    }
}

impl Default for InMemorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn put(&self, tasks: Vec<Task>) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some((Instant::now(), tasks));
    }

    fn get(&self) -> Option<Vec<Task>> {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        match guard.as_ref() {
            Some((stored_at, tasks)) if stored_at.elapsed() <= self.max_age => Some(tasks.clone()),
            _ => None,
        }
    }

    fn clear(&self) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use db::models::task::TaskPriority;

    use super::*;

    fn sample_task() -> Task {
        Task {
            id: 1,
            name: "snapshot me".into(),
            description: String::new(),
            due_date: NaiveDate::from_ymd_opt(2026, 8, 24).unwrap(),
            status: false,
            priority: TaskPriority::Medium,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn put_then_get_returns_fresh_snapshot() {
        let store = InMemorySnapshotStore::new();
        assert!(store.get().is_none());
        store.put(vec![sample_task()]);
        let tasks = store.get().expect("fresh snapshot");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, 1);
    }

    #[test]
    fn expired_snapshot_is_dropped() {
        let store = InMemorySnapshotStore::with_max_age(Duration::ZERO);
        store.put(vec![sample_task()]);
        std::thread::sleep(Duration::from_millis(5));
        assert!(store.get().is_none());
    }

    #[test]
    fn clear_removes_snapshot() {
        let store = InMemorySnapshotStore::new();
        store.put(vec![sample_task()]);
        store.clear();
        assert!(store.get().is_none());
    }
}

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

#[derive(
    Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    /// Ordering rank used by the heuristic scheduler: urgent > high > medium > low.
    pub fn rank(self) -> u8 {
        match self {
            TaskPriority::Urgent => 4,
            TaskPriority::High => 3,
            TaskPriority::Medium => 2,
            TaskPriority::Low => 1,
        }
    }

    /// Parse a client-supplied priority, accepting any casing. Absent input
    /// normalizes to medium.
    pub fn parse_normalized(value: Option<&str>) -> Option<Self> {
        match value {
            None => Some(TaskPriority::default()),
            Some(s) if s.trim().is_empty() => Some(TaskPriority::default()),
            Some(s) => TaskPriority::from_str(&s.trim().to_lowercase()).ok(),
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub name: String,
    #[serde(rename = "desc")]
    pub description: String,
    pub due_date: NaiveDate,
    /// Completion flag; false = pending.
    pub status: bool,
    pub priority: TaskPriority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    pub name: String,
    #[serde(default, rename = "desc")]
    pub description: String,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub status: Option<bool>,
    /// Raw priority string; validated and lowercased at the boundary.
    #[serde(default)]
    pub priority: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    pub name: String,
    #[serde(default, rename = "desc")]
    pub description: String,
    pub due_date: NaiveDate,
    pub status: bool,
    #[serde(default)]
    pub priority: Option<String>,
}

const TASK_COLUMNS: &str =
    "id, name, description, due_date, status, priority, created_at, updated_at";

impl Task {
    /// All tasks, newest first.
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks ORDER BY id DESC"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateTask,
        priority: TaskPriority,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (name, description, due_date, status, priority)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.due_date)
        .bind(data.status.unwrap_or(false))
        .bind(priority)
        .fetch_one(pool)
        .await
    }

    /// Update the editable fields. Priority is only replaced when the client
    /// sent one (COALESCE keeps the stored value otherwise).
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: &UpdateTask,
        priority: Option<TaskPriority>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks
             SET name = $2,
                 description = $3,
                 due_date = $4,
                 status = $5,
                 priority = COALESCE($6, priority),
                 updated_at = CURRENT_TIMESTAMP
             WHERE id = $1
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.due_date)
        .bind(data.status)
        .bind(priority)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_defaults_to_medium_when_absent() {
        assert_eq!(
            TaskPriority::parse_normalized(None),
            Some(TaskPriority::Medium)
        );
        assert_eq!(
            TaskPriority::parse_normalized(Some("")),
            Some(TaskPriority::Medium)
        );
    }

    #[test]
    fn priority_parsing_is_case_insensitive() {
        assert_eq!(
            TaskPriority::parse_normalized(Some("URGENT")),
            Some(TaskPriority::Urgent)
        );
        assert_eq!(
            TaskPriority::parse_normalized(Some("High")),
            Some(TaskPriority::High)
        );
    }

    #[test]
    fn priority_parsing_rejects_unknown_values() {
        assert_eq!(TaskPriority::parse_normalized(Some("critical")), None);
    }

    #[test]
    fn priority_rank_ordering() {
        assert!(TaskPriority::Urgent.rank() > TaskPriority::High.rank());
        assert!(TaskPriority::High.rank() > TaskPriority::Medium.rank());
        assert!(TaskPriority::Medium.rank() > TaskPriority::Low.rank());
    }

    #[test]
    fn task_serializes_with_wire_field_names() {
        let task = Task {
            id: 1,
            name: "Walk the dog".into(),
            description: "around the park".into(),
            due_date: NaiveDate::from_ymd_opt(2026, 8, 24).unwrap(),
            status: false,
            priority: TaskPriority::High,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["desc"], "around the park");
        assert_eq!(json["dueDate"], "2026-08-24");
        assert_eq!(json["priority"], "high");
        assert_eq!(json["status"], false);
    }
}

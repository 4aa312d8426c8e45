use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;

/// Project member. The roster is fixed and seeded by migration; the API is
/// read-only.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub college: String,
}

impl Member {
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Member>(
            "SELECT id, first_name, last_name, college FROM members ORDER BY id",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Member>(
            "SELECT id, first_name, last_name, college FROM members WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}

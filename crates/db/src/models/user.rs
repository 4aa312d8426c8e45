use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct User {
    pub id: i64,
    pub google_id: Option<String>,
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub name: String,
    pub email: String,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Public user shape returned from the auth endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UserInfo {
    pub name: String,
    pub email: String,
    pub profile_picture: Option<String>,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            profile_picture: user.profile_picture.clone(),
        }
    }
}

const USER_COLUMNS: &str =
    "id, google_id, username, password_hash, name, email, profile_picture, created_at";

impl User {
    pub async fn find_by_google_id_or_email(
        pool: &SqlitePool,
        google_id: &str,
        email: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE google_id = $1 OR email = $2"
        ))
        .bind(google_id)
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_username(
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    /// Insert a Google-authenticated user if this is their first sign-in,
    /// otherwise return the stored row.
    pub async fn upsert_google(
        pool: &SqlitePool,
        google_id: &str,
        name: &str,
        email: &str,
        profile_picture: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        if let Some(existing) = Self::find_by_google_id_or_email(pool, google_id, email).await? {
            return Ok(existing);
        }

        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (google_id, name, email, profile_picture)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(google_id)
        .bind(name)
        .bind(email)
        .bind(profile_picture)
        .fetch_one(pool)
        .await
    }

    pub async fn create_local(
        pool: &SqlitePool,
        username: &str,
        email: &str,
        password_hash: &str,
        name: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, password_hash, name)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .fetch_one(pool)
        .await
    }
}

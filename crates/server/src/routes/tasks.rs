//! Task CRUD routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::task::{CreateTask, Task, TaskPriority, UpdateTask};
use tracing::warn;
use utils::response::ApiResponse;

use crate::{error::ApiError, state::AppState};

const PRIORITY_HINT: &str = "Priority must be one of: low, medium, high, urgent";

/// All tasks, newest first. When the database is unreachable, a snapshot
/// taken within the last hour is served instead, flagged in the message.
pub async fn get_tasks(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Task>>>, ApiError> {
    match Task::find_all(&state.db.pool).await {
        Ok(tasks) => {
            state.snapshots.put(tasks.clone());
            Ok(ResponseJson(ApiResponse::success(tasks)))
        }
        Err(e) => {
            warn!(error = %e, "task query failed, trying snapshot");
            match state.snapshots.get() {
                Some(tasks) => Ok(ResponseJson(ApiResponse::success_with_message(
                    tasks,
                    "offline data",
                ))),
                None => Err(ApiError::Database(e)),
            }
        }
    }
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    let task = Task::find_by_id(&state.db.pool, id)
        .await?
        .ok_or(ApiError::NotFound("Task"))?;
    Ok(ResponseJson(ApiResponse::success(task)))
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<CreateTask>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Task name must not be empty".into()));
    }
    let priority = TaskPriority::parse_normalized(payload.priority.as_deref())
        .ok_or_else(|| ApiError::BadRequest(PRIORITY_HINT.into()))?;

    let task = Task::create(&state.db.pool, &payload, priority).await?;
    Ok(ResponseJson(ApiResponse::success(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateTask>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Task name must not be empty".into()));
    }
    // Absent priority keeps the stored value; present ones must be valid.
    let priority = match payload.priority.as_deref() {
        None => None,
        Some(raw) => Some(
            TaskPriority::parse_normalized(Some(raw))
                .ok_or_else(|| ApiError::BadRequest(PRIORITY_HINT.into()))?,
        ),
    };

    let task = Task::update(&state.db.pool, id, &payload, priority)
        .await?
        .ok_or(ApiError::NotFound("Task"))?;
    Ok(ResponseJson(ApiResponse::success(task)))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows_affected = Task::delete(&state.db.pool, id).await?;
    if rows_affected == 0 {
        return Err(ApiError::NotFound("Task"));
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(get_tasks).post(create_task))
        .route(
            "/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
}

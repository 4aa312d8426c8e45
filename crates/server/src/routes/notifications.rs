//! Reminder notification routes: the in-memory notification list plus
//! service enable/disable.

use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{delete, get, post},
};
use serde::Serialize;
use services::services::reminders::{PriorityCounts, TaskNotification};
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct ReminderStatus {
    pub enabled: bool,
    pub unread_count: usize,
}

pub async fn list_notifications(
    State(state): State<AppState>,
) -> ResponseJson<ApiResponse<Vec<TaskNotification>>> {
    ResponseJson(ApiResponse::success(state.reminders.log().list().await))
}

pub async fn notification_counts(
    State(state): State<AppState>,
) -> ResponseJson<ApiResponse<PriorityCounts>> {
    ResponseJson(ApiResponse::success(
        state.reminders.log().priority_counts().await,
    ))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    if !state.reminders.log().mark_read(id).await {
        return Err(ApiError::NotFound("Notification"));
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn mark_all_read(State(state): State<AppState>) -> ResponseJson<ApiResponse<()>> {
    state.reminders.log().mark_all_read().await;
    ResponseJson(ApiResponse::success(()))
}

pub async fn dismiss(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    if !state.reminders.log().dismiss(id).await {
        return Err(ApiError::NotFound("Notification"));
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn clear_all(State(state): State<AppState>) -> ResponseJson<ApiResponse<()>> {
    state.reminders.log().clear().await;
    ResponseJson(ApiResponse::success(()))
}

pub async fn enable_reminders(
    State(state): State<AppState>,
) -> ResponseJson<ApiResponse<ReminderStatus>> {
    state.reminders.enable();
    status_response(&state).await
}

pub async fn disable_reminders(
    State(state): State<AppState>,
) -> ResponseJson<ApiResponse<ReminderStatus>> {
    state.reminders.disable();
    status_response(&state).await
}

pub async fn reminder_status(
    State(state): State<AppState>,
) -> ResponseJson<ApiResponse<ReminderStatus>> {
    status_response(&state).await
}

async fn status_response(state: &AppState) -> ResponseJson<ApiResponse<ReminderStatus>> {
    ResponseJson(ApiResponse::success(ReminderStatus {
        enabled: state.reminders.is_enabled(),
        unread_count: state.reminders.log().unread_count().await,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            get(list_notifications).delete(clear_all),
        )
        .route("/notifications/counts", get(notification_counts))
        .route("/notifications/read-all", post(mark_all_read))
        .route("/notifications/{id}/read", post(mark_read))
        .route("/notifications/{id}", delete(dismiss))
        .route("/notifications/enable", post(enable_reminders))
        .route("/notifications/disable", post(disable_reminders))
        .route("/notifications/status", get(reminder_status))
}

//! AI assistant routes. Every endpoint answers even when the AI backend is
//! down or unconfigured; the payload's `source` tag tells the client which
//! path produced it.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use chrono::Utc;
use db::models::task::Task;
use serde::Deserialize;
use services::services::{
    assistant::{
        AiOutcome, BreakTimer, DeadlineSuggestion, DuplicatePair, FocusRecommendation,
        ProductivitySummary, ReschedulingSuggestion, ScheduledTask, SmartSuggestion, TaskConflict,
        TaskGroup, VoiceCommand, WeatherSuggestion, WeeklyPrediction,
    },
    summary::SUMMARY_WINDOWS,
};
use tracing::warn;
use utils::response::ApiResponse;

use crate::{error::ApiError, state::AppState};

/// Current tasks for an assistant feature. A stale snapshot beats an empty
/// answer here, so the snapshot is consulted before the error surfaces.
async fn load_tasks(state: &AppState) -> Result<Vec<Task>, ApiError> {
    match Task::find_all(&state.db.pool).await {
        Ok(tasks) => {
            state.snapshots.put(tasks.clone());
            Ok(tasks)
        }
        Err(e) => {
            warn!(error = %e, "task query failed, trying snapshot");
            state.snapshots.get().ok_or(ApiError::Database(e))
        }
    }
}

pub async fn task_groups(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<AiOutcome<Vec<TaskGroup>>>>, ApiError> {
    let tasks = load_tasks(&state).await?;
    let outcome = state.assistant.group_tasks(&tasks).await;
    Ok(ResponseJson(ApiResponse::success(outcome)))
}

pub async fn weather_suggestions(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<AiOutcome<Vec<WeatherSuggestion>>>>, ApiError> {
    let tasks = load_tasks(&state).await?;
    let outcome = state.assistant.weather_suggestions(&tasks).await;
    Ok(ResponseJson(ApiResponse::success(outcome)))
}

pub async fn smart_suggestions(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<AiOutcome<Vec<SmartSuggestion>>>>, ApiError> {
    let tasks = load_tasks(&state).await?;
    let outcome = state.assistant.smart_suggestions(&tasks).await;
    Ok(ResponseJson(ApiResponse::success(outcome)))
}

pub async fn optimal_schedule(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<AiOutcome<Vec<ScheduledTask>>>>, ApiError> {
    let tasks = load_tasks(&state).await?;
    let outcome = state.assistant.optimal_schedule(&tasks).await;
    Ok(ResponseJson(ApiResponse::success(outcome)))
}

pub async fn deadline_suggestions(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<AiOutcome<Vec<DeadlineSuggestion>>>>, ApiError> {
    let tasks = load_tasks(&state).await?;
    let outcome = state.assistant.deadline_suggestions(&tasks).await;
    Ok(ResponseJson(ApiResponse::success(outcome)))
}

pub async fn focus_recommendation(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<AiOutcome<FocusRecommendation>>>, ApiError> {
    let tasks = load_tasks(&state).await?;
    let outcome = state.assistant.focus_recommendation(&tasks).await;
    Ok(ResponseJson(ApiResponse::success(outcome)))
}

pub async fn detect_duplicates(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<AiOutcome<Vec<DuplicatePair>>>>, ApiError> {
    let tasks = load_tasks(&state).await?;
    let outcome = state.assistant.detect_duplicates(&tasks).await;
    Ok(ResponseJson(ApiResponse::success(outcome)))
}

pub async fn rescheduling_suggestions(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<AiOutcome<Vec<ReschedulingSuggestion>>>>, ApiError> {
    let tasks = load_tasks(&state).await?;
    let outcome = state.assistant.rescheduling_suggestions(&tasks).await;
    Ok(ResponseJson(ApiResponse::success(outcome)))
}

pub async fn resolve_conflicts(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<AiOutcome<Vec<TaskConflict>>>>, ApiError> {
    let tasks = load_tasks(&state).await?;
    let outcome = state.assistant.resolve_conflicts(&tasks).await;
    Ok(ResponseJson(ApiResponse::success(outcome)))
}

pub async fn break_timer(State(state): State<AppState>) -> ResponseJson<ApiResponse<BreakTimer>> {
    ResponseJson(ApiResponse::success(state.assistant.break_timer()))
}

#[derive(Debug, Deserialize)]
pub struct VoiceCommandRequest {
    pub command: String,
}

pub async fn voice_command(
    State(state): State<AppState>,
    Json(payload): Json<VoiceCommandRequest>,
) -> Result<ResponseJson<ApiResponse<AiOutcome<VoiceCommand>>>, ApiError> {
    if payload.command.trim().is_empty() {
        return Err(ApiError::BadRequest("Command must not be empty".into()));
    }
    let tasks = load_tasks(&state).await?;
    let outcome = state.assistant.voice_command(&payload.command, &tasks).await;
    Ok(ResponseJson(ApiResponse::success(outcome)))
}

pub async fn weekly_prediction(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<AiOutcome<WeeklyPrediction>>>, ApiError> {
    let tasks = load_tasks(&state).await?;
    let outcome = state.assistant.weekly_prediction(&tasks).await;
    Ok(ResponseJson(ApiResponse::success(outcome)))
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    #[serde(default = "default_summary_days")]
    pub days: u32,
}

fn default_summary_days() -> u32 {
    7
}

pub async fn productivity_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Result<ResponseJson<ApiResponse<AiOutcome<ProductivitySummary>>>, ApiError> {
    if !SUMMARY_WINDOWS.contains(&query.days) {
        return Err(ApiError::BadRequest(format!(
            "days must be one of: {SUMMARY_WINDOWS:?}"
        )));
    }
    let tasks = load_tasks(&state).await?;
    let outcome = state
        .assistant
        .productivity_summary(&tasks, query.days, Utc::now().date_naive())
        .await;
    Ok(ResponseJson(ApiResponse::success(outcome)))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/assistant",
        Router::new()
            .route("/groups", get(task_groups))
            .route("/weather-suggestions", get(weather_suggestions))
            .route("/smart-suggestions", get(smart_suggestions))
            .route("/schedule", get(optimal_schedule))
            .route("/deadlines", get(deadline_suggestions))
            .route("/focus", get(focus_recommendation))
            .route("/duplicates", get(detect_duplicates))
            .route("/rescheduling", get(rescheduling_suggestions))
            .route("/conflicts", get(resolve_conflicts))
            .route("/break-timer", get(break_timer))
            .route("/voice-command", post(voice_command))
            .route("/weekly-prediction", get(weekly_prediction))
            .route("/summary", get(productivity_summary)),
    )
}

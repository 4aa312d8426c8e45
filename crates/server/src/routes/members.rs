//! Read-only project member roster.

use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::member::Member;
use utils::response::ApiResponse;

use crate::{error::ApiError, state::AppState};

pub async fn get_members(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Member>>>, ApiError> {
    let members = Member::find_all(&state.db.pool).await?;
    Ok(ResponseJson(ApiResponse::success(members)))
}

pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<Member>>, ApiError> {
    let member = Member::find_by_id(&state.db.pool, id)
        .await?
        .ok_or(ApiError::NotFound("Member"))?;
    Ok(ResponseJson(ApiResponse::success(member)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/members", get(get_members))
        .route("/members/{id}", get(get_member))
}

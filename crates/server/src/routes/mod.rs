pub mod assistant;
pub mod auth;
pub mod members;
pub mod notifications;
pub mod tasks;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(tasks::router())
        .merge(members::router())
        .merge(auth::router())
        .merge(notifications::router())
        .merge(assistant::router());

    Router::new()
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

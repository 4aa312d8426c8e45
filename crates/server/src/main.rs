mod error;
mod routes;
mod state;

use std::sync::Arc;

use anyhow::Context;
use db::DBService;
use services::services::{
    assistant::Assistant, config::Config, reminders::ReminderService,
    snapshot::InMemorySnapshotStore,
};
use state::AppState;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Arc::new(Config::from_env());

    let db = DBService::new(&config.database_url)
        .await
        .context("failed to open database")?;

    let assistant = Arc::new(Assistant::from_config(&config));

    let reminders = ReminderService::new(db.clone());
    reminders.clone().spawn();

    let http = reqwest::Client::new();

    let state = AppState {
        db,
        config: config.clone(),
        assistant,
        reminders,
        snapshots: Arc::new(InMemorySnapshotStore::new()),
        http,
    };

    let app = routes::router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("listening on {}", addr);

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

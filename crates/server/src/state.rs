use std::sync::Arc;

use db::DBService;
use services::services::{
    assistant::Assistant, config::Config, reminders::ReminderService, snapshot::SnapshotStore,
};

/// Shared handler state. Cheap to clone; every field is an Arc or an
/// Arc-backed handle.
#[derive(Clone)]
pub struct AppState {
    pub db: DBService,
    pub config: Arc<Config>,
    pub assistant: Arc<Assistant>,
    pub reminders: ReminderService,
    pub snapshots: Arc<dyn SnapshotStore>,
    pub http: reqwest::Client,
}

pub mod assistant;
pub mod classifier;
pub mod config;
pub mod gemini;
pub mod reminders;
pub mod scheduler;
pub mod snapshot;
pub mod summary;

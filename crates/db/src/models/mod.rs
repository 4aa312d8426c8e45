pub mod member;
pub mod task;
pub mod user;

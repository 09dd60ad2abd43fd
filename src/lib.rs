//! Order Cache - a small order service over a Redis distributed cache
//!
//! Orders are cached as JSON under their id, with typed get/set/remove and a
//! cache-aside read on top of a pluggable key/value store.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_cleanup_task;

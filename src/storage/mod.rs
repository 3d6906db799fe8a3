//! Storage Layer - SQLite-backed persistence
//!
//! System of record is a single SQLite table:
//! - feedback(id, content, created_at, starred)

pub mod schema;
pub mod sqlite;

pub use sqlite::{FeedbackStore, DbStats};

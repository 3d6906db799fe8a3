//! # anon-feedback - Anonymous Feedback Box
//!
//! A tiny service for collecting anonymous text feedback.
//!
//! anon-feedback provides:
//! - A single SQLite-backed `feedback` table
//! - A JSON API to list, create, star and delete entries
//! - A CLI to serve the API or manage the table directly

pub mod feedback;
pub mod storage;
pub mod server;
pub mod output;
pub mod config;
pub mod ui;


// Re-exports for convenient access
pub use feedback::{Feedback, NewFeedback, SortOrder};
pub use storage::FeedbackStore;

/// Result type alias for feedback operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for feedback operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("Feedback not found")]
    NotFound { id: i64 },

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl Error {
    /// True for errors caused by the caller rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::NotFound { .. })
    }
}

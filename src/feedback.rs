//! Feedback types
//!
//! A feedback entry is the only entity the service knows about:
//! - `Feedback`: a persisted row as returned to clients
//! - `NewFeedback`: validated input for a row that doesn't exist yet
//! - `SortOrder`: the two orderings the listing supports

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Message returned when a submission carries no usable content
pub const CONTENT_REQUIRED: &str = "Content is required";

/// A persisted feedback entry.
///
/// `content` and `created_at` never change after insertion; `starred`
/// is the only field the service ever updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    /// Assigned by storage, never reused
    pub id: i64,
    pub content: String,
    /// Storage timestamp (`YYYY-MM-DD HH:MM:SS`, UTC)
    pub created_at: String,
    pub starred: bool,
}

/// Content accepted for a new feedback entry.
///
/// Holding one of these means the content is present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    content: String,
}

impl NewFeedback {
    /// Validate raw submitted content.
    ///
    /// Missing (`None`) and empty content are both rejected. Whitespace is
    /// kept as submitted.
    pub fn parse(content: Option<String>) -> Result<Self> {
        match content {
            Some(content) if !content.is_empty() => Ok(Self { content }),
            _ => Err(Error::Validation(CONTENT_REQUIRED.to_string())),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl FromStr for NewFeedback {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(Some(s.to_string()))
    }
}

/// Ordering for feedback listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Newest first
    #[default]
    Date,
    /// Starred entries first, newest first within each group
    Starred,
}

impl SortOrder {
    /// Get the string representation of the sort order
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Date => "date",
            SortOrder::Starred => "starred",
        }
    }

    /// Parse a `sort` query value, falling back to `Date` for anything
    /// unrecognized or absent.
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("starred") => SortOrder::Starred,
            _ => SortOrder::Date,
        }
    }

    /// SQL `ORDER BY` clause for this ordering.
    ///
    /// Booleans are stored as 0/1, so `starred DESC` puts starred rows first.
    /// `id DESC` settles ties between rows created within the same second.
    pub(crate) fn order_by(&self) -> &'static str {
        match self {
            SortOrder::Date => "created_at DESC, id DESC",
            SortOrder::Starred => "starred DESC, created_at DESC, id DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "date" | "newest" | "created_at" => Ok(SortOrder::Date),
            "starred" | "star" | "stars" => Ok(SortOrder::Starred),
            _ => Err(Error::Validation(format!("Unknown sort order: {}", s))),
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

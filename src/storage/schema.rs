//! Database schema definitions

/// SQL to create the feedback table
///
/// `AUTOINCREMENT` keeps ids of deleted rows from being handed out again.
pub const CREATE_FEEDBACK_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS feedback (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    content TEXT NOT NULL,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    starred BOOLEAN DEFAULT FALSE
)
"#;

/// Columns selected whenever a full row is materialized, in `Feedback` field order
pub const FEEDBACK_COLUMNS: &str = "id, content, created_at, starred";

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    vec![CREATE_FEEDBACK_TABLE]
}

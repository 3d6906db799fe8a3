//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, params, OptionalExtension};
use crate::{Result, Error};
use crate::feedback::{Feedback, NewFeedback, SortOrder};
use super::schema::{self, FEEDBACK_COLUMNS};

/// SQLite-backed storage for feedback entries.
///
/// Owns exactly one connection. The connection is closed when the store is
/// dropped, so a store scoped to one request releases it on every exit path.
pub struct FeedbackStore {
    conn: Connection,
}

impl FeedbackStore {
    /// Open a database file (creates the file if it doesn't exist).
    ///
    /// The schema is not touched; call [`FeedbackStore::ensure_schema`] once
    /// at startup.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database with the schema in place (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Create the feedback table if it is missing. Idempotent.
    pub fn ensure_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    // ========== Feedback Operations ==========

    /// List every feedback entry in the requested order
    pub fn list_feedback(&self, sort: SortOrder) -> Result<Vec<Feedback>> {
        let sql = format!(
            "SELECT {} FROM feedback ORDER BY {}",
            FEEDBACK_COLUMNS,
            sort.order_by()
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let feedback = stmt
            .query_map([], |row| self.row_to_feedback(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(feedback)
    }

    /// Insert a new entry and return it as stored
    pub fn create_feedback(&self, new: &NewFeedback) -> Result<Feedback> {
        self.conn.execute(
            "INSERT INTO feedback (content) VALUES (?1)",
            [new.content()],
        )?;
        let id = self.conn.last_insert_rowid();

        self.get_feedback(id)?.ok_or(Error::NotFound { id })
    }

    /// Get a feedback entry by id
    pub fn get_feedback(&self, id: i64) -> Result<Option<Feedback>> {
        let sql = format!("SELECT {} FROM feedback WHERE id = ?1", FEEDBACK_COLUMNS);
        self.conn
            .query_row(&sql, [id], |row| self.row_to_feedback(row))
            .optional()
            .map_err(Into::into)
    }

    /// Flip the starred flag of an entry and return the updated row.
    ///
    /// Reads the current flag, writes its negation, then re-reads the row.
    pub fn toggle_star(&self, id: i64) -> Result<Feedback> {
        let starred: bool = self
            .conn
            .query_row("SELECT starred FROM feedback WHERE id = ?1", [id], |row| row.get(0))
            .optional()?
            .ok_or(Error::NotFound { id })?;

        self.conn.execute(
            "UPDATE feedback SET starred = ?1 WHERE id = ?2",
            params![!starred, id],
        )?;

        self.get_feedback(id)?.ok_or(Error::NotFound { id })
    }

    /// Physically delete an entry
    pub fn delete_feedback(&self, id: i64) -> Result<()> {
        let exists = self
            .conn
            .query_row("SELECT id FROM feedback WHERE id = ?1", [id], |row| row.get::<_, i64>(0))
            .optional()?
            .is_some();

        if !exists {
            return Err(Error::NotFound { id });
        }

        self.conn.execute("DELETE FROM feedback WHERE id = ?1", [id])?;
        Ok(())
    }

    /// Count all feedback entries
    pub fn count_feedback(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM feedback", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Count starred feedback entries
    pub fn count_starred(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM feedback WHERE starred",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            total: self.count_feedback()?,
            starred: self.count_starred()?,
        })
    }

    /// Helper to convert a row to Feedback
    fn row_to_feedback(&self, row: &rusqlite::Row) -> rusqlite::Result<Feedback> {
        Ok(Feedback {
            id: row.get(0)?,
            content: row.get(1)?,
            created_at: row.get(2)?,
            starred: row.get(3)?,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct DbStats {
    pub total: usize,
    pub starred: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Feedback: {}", self.total)?;
        writeln!(f, "  Starred: {}", self.starred)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_feedback(content: &str) -> NewFeedback {
        content.parse().unwrap()
    }

    /// Insert a row with a fixed timestamp so ordering tests don't depend on the clock
    fn insert_at(store: &FeedbackStore, content: &str, created_at: &str, starred: bool) -> i64 {
        store
            .conn
            .execute(
                "INSERT INTO feedback (content, created_at, starred) VALUES (?1, ?2, ?3)",
                params![content, created_at, starred],
            )
            .unwrap();
        store.conn.last_insert_rowid()
    }

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let store = FeedbackStore::open_in_memory().unwrap();
        store.create_feedback(&new_feedback("kept")).unwrap();

        store.ensure_schema().unwrap();
        store.ensure_schema().unwrap();

        assert_eq!(store.count_feedback().unwrap(), 1);
    }

    #[test]
    fn test_create_feedback() {
        let store = FeedbackStore::open_in_memory().unwrap();

        let created = store.create_feedback(&new_feedback("Great app!")).unwrap();
        assert_eq!(created.content, "Great app!");
        assert!(!created.starred);
        assert!(!created.created_at.is_empty());

        let listed = store.list_feedback(SortOrder::Date).unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let store = FeedbackStore::open_in_memory().unwrap();

        let first = store.create_feedback(&new_feedback("first")).unwrap();
        store.delete_feedback(first.id).unwrap();
        let second = store.create_feedback(&new_feedback("second")).unwrap();

        assert!(second.id > first.id);
    }

    #[test]
    fn test_list_empty_table() {
        let store = FeedbackStore::open_in_memory().unwrap();
        assert!(store.list_feedback(SortOrder::Date).unwrap().is_empty());
        assert!(store.list_feedback(SortOrder::Starred).unwrap().is_empty());
    }

    #[test]
    fn test_list_by_date_newest_first() {
        let store = FeedbackStore::open_in_memory().unwrap();
        insert_at(&store, "old", "2024-01-01 10:00:00", false);
        insert_at(&store, "new", "2024-03-01 10:00:00", false);
        insert_at(&store, "mid", "2024-02-01 10:00:00", true);

        let contents: Vec<String> = store
            .list_feedback(SortOrder::Date)
            .unwrap()
            .into_iter()
            .map(|f| f.content)
            .collect();
        assert_eq!(contents, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_list_by_starred_groups_then_date() {
        let store = FeedbackStore::open_in_memory().unwrap();
        insert_at(&store, "plain old", "2024-01-01 10:00:00", false);
        insert_at(&store, "starred old", "2024-01-02 10:00:00", true);
        insert_at(&store, "plain new", "2024-03-01 10:00:00", false);
        insert_at(&store, "starred new", "2024-02-01 10:00:00", true);

        let listed = store.list_feedback(SortOrder::Starred).unwrap();
        let contents: Vec<&str> = listed.iter().map(|f| f.content.as_str()).collect();
        assert_eq!(contents, vec!["starred new", "starred old", "plain new", "plain old"]);

        let first_plain = listed.iter().position(|f| !f.starred).unwrap();
        assert!(listed[first_plain..].iter().all(|f| !f.starred));
    }

    #[test]
    fn test_same_second_ties_newest_insert_first() {
        let store = FeedbackStore::open_in_memory().unwrap();
        let a = insert_at(&store, "a", "2024-01-01 10:00:00", false);
        let b = insert_at(&store, "b", "2024-01-01 10:00:00", false);

        let ids: Vec<i64> = store
            .list_feedback(SortOrder::Date)
            .unwrap()
            .iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(ids, vec![b, a]);
    }

    #[test]
    fn test_toggle_star_is_an_involution() {
        let store = FeedbackStore::open_in_memory().unwrap();
        let created = store.create_feedback(&new_feedback("toggle me")).unwrap();

        let starred = store.toggle_star(created.id).unwrap();
        assert!(starred.starred);
        assert_eq!(starred.content, created.content);
        assert_eq!(starred.created_at, created.created_at);

        let unstarred = store.toggle_star(created.id).unwrap();
        assert_eq!(unstarred, created);
    }

    #[test]
    fn test_missing_ids_are_not_found() {
        let store = FeedbackStore::open_in_memory().unwrap();
        let kept = store.create_feedback(&new_feedback("kept")).unwrap();

        assert!(matches!(store.toggle_star(kept.id + 100), Err(Error::NotFound { .. })));
        assert!(matches!(store.delete_feedback(kept.id + 100), Err(Error::NotFound { .. })));

        assert_eq!(store.list_feedback(SortOrder::Date).unwrap(), vec![kept]);
    }

    #[test]
    fn test_deleted_entry_is_gone() {
        let store = FeedbackStore::open_in_memory().unwrap();
        let created = store.create_feedback(&new_feedback("short lived")).unwrap();

        store.delete_feedback(created.id).unwrap();

        assert!(store.get_feedback(created.id).unwrap().is_none());
        assert!(matches!(store.toggle_star(created.id), Err(Error::NotFound { id }) if id == created.id));
        assert!(matches!(store.delete_feedback(created.id), Err(Error::NotFound { .. })));
    }

    #[test]
    fn test_stats() {
        let store = FeedbackStore::open_in_memory().unwrap();
        let first = store.create_feedback(&new_feedback("one")).unwrap();
        store.create_feedback(&new_feedback("two")).unwrap();
        store.toggle_star(first.id).unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.starred, 1);
    }

    #[test]
    fn test_file_backed_store_persists_across_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedback.db");

        let id = {
            let store = FeedbackStore::open(&path).unwrap();
            store.ensure_schema().unwrap();
            store.create_feedback(&new_feedback("persisted")).unwrap().id
        };

        let reopened = FeedbackStore::open(&path).unwrap();
        let found = reopened.get_feedback(id).unwrap().unwrap();
        assert_eq!(found.content, "persisted");
    }
}

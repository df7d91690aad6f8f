use rusqlite::{Connection, OptionalExtension, params};

use crate::database::DatabaseError;
use crate::models::Done;

/// Done markers, keyed by the id of the task they complete.
pub struct DoneStore<'a> {
    conn: &'a Connection,
}

impl<'a> DoneStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn get(&self, task_id: i64) -> Result<Option<Done>, DatabaseError> {
        let done = self
            .conn
            .query_row(
                "SELECT id FROM dones WHERE id = ?1",
                params![task_id],
                |row| Ok(Done { id: row.get(0)? }),
            )
            .optional()?;
        Ok(done)
    }

    /// Insert a marker for `task_id`. Does not look for an existing marker
    /// first; a duplicate surfaces as a constraint violation.
    pub fn create(&self, task_id: i64) -> Result<Done, DatabaseError> {
        self.conn
            .execute("INSERT INTO dones (id) VALUES (?1)", params![task_id])?;
        tracing::debug!(task_id, "Marked task done");
        Ok(Done { id: task_id })
    }

    pub fn delete(&self, original: Done) -> Result<(), DatabaseError> {
        self.conn
            .execute("DELETE FROM dones WHERE id = ?1", params![original.id])?;
        tracing::debug!(task_id = original.id, "Cleared done marker");
        Ok(())
    }
}
